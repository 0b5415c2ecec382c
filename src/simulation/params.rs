//! Simulation and controller hyperparameters.

/// Battery ticks held back beyond the computed round-trip cost.
pub const DEFAULT_SAFETY_MARGIN: u32 = 2;
/// Margin used by the cautious controller variant (10% of a 100-tick battery).
pub const CAUTIOUS_SAFETY_MARGIN: u32 = 10;
/// Highest dirt level a single cell can hold.
pub const MAX_DIRT: u8 = 9;
/// Ticks a fully drained battery needs on the dock to reach capacity.
pub const RECHARGE_TICKS: u32 = 20;
/// Hand-offs between states allowed inside a single tick.
pub const MAX_TRANSITIONS_PER_TICK: usize = 8;

// Scoring
pub const DIRT_PENALTY: u64 = 300;
pub const BUDGET_EXHAUSTED_PENALTY: u64 = 2000;
pub const FINISHED_AWAY_PENALTY: u64 = 3000;
pub const NOT_IN_DOCK_PENALTY: u64 = 1000;

// Harness
pub const DEFAULT_THREADS: usize = 10;
/// Default wall-clock allowance per unit of step budget.
pub const TIMEOUT_MS_PER_STEP: u64 = 1;
pub const HOUSE_EXTENSION: &str = "house";
pub const SUMMARY_FILE: &str = "summary.csv";

// Viewer
pub const DEFAULT_TICK_MS: u64 = 80;
pub const RANDOM_HOUSE_ROWS: usize = 14;
pub const RANDOM_HOUSE_COLS: usize = 40;
pub const RANDOM_WALL_DENSITY: f64 = 0.18;
pub const RANDOM_DIRT_DENSITY: f64 = 0.25;
