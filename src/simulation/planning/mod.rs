//! Route planning for the cleaning agent.
//!
//! This module provides:
//! - A* point-to-point search with a BFS fallback through frontier cells
//! - Nearest-match search used to pick the next exploration or cleaning target
//! - BFS distance fields for round-trip budgeting

mod astar;
mod search;

pub use astar::PathPlanner;
pub use search::{distance_field, nearest_matching, through_frontier};
