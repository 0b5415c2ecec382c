pub mod agent;
pub mod environment;
pub mod geometry;
pub mod memory;
pub mod params;
pub mod planning;
pub mod registry;
pub mod scoring;
pub mod sensors;
pub mod vacuum;

pub use agent::{Algorithm, ControllerConfig, ControllerState, TaskController};
pub use environment::House;
pub use geometry::{Action, Direction, Position};
pub use registry::AgentRegistry;
pub use vacuum::{Simulator, StepOutcome};
