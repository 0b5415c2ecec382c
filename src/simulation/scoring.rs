//! Run scoring. Lower is better.

use crate::simulation::params::{
    BUDGET_EXHAUSTED_PENALTY, DIRT_PENALTY, FINISHED_AWAY_PENALTY, NOT_IN_DOCK_PENALTY,
};

/// Scores a finished, aborted, or still-running run.
///
/// - budget used up: `budget * 2 + dirt * 300 + 2000`
/// - finished away from the dock: `budget + dirt * 300 + 3000`
/// - otherwise: `steps + dirt * 300`, plus 1000 when not docked
#[must_use]
pub fn score(
    steps_taken: usize,
    dirt_remaining: u32,
    finished_cleanly: bool,
    ended_in_dock: bool,
    step_budget: usize,
) -> u64 {
    let steps = steps_taken as u64;
    let budget = step_budget as u64;
    let dirt = u64::from(dirt_remaining) * DIRT_PENALTY;

    if steps_taken >= step_budget {
        budget * 2 + dirt + BUDGET_EXHAUSTED_PENALTY
    } else if finished_cleanly && !ended_in_dock {
        budget + dirt + FINISHED_AWAY_PENALTY
    } else {
        steps + dirt + if ended_in_dock { 0 } else { NOT_IN_DOCK_PENALTY }
    }
}
