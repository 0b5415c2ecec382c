//! Memory systems for the cleaning agent.
//!
//! The agent remembers the house in a sparse grid keyed by positions relative
//! to the dock, grown one sensor reading at a time.

pub mod grid_knowledge;

pub use grid_knowledge::{CellStatus, GridKnowledge};
