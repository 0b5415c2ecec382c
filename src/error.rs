//! Error types for house loading, simulation and the batch harness.

use std::path::PathBuf;

use thiserror::Error;

use crate::simulation::geometry::Position;

/// Errors that can occur outside the controller's own decision loop.
#[derive(Debug, Error)]
pub enum SimError {
    /// A house file line could not be understood.
    #[error("{path}: line {line}: {reason}")]
    HouseParse {
        /// File (or in-memory label) being parsed.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    #[error("house '{0}' has no docking station")]
    MissingDock(String),

    #[error("house '{name}' has a second docking station at {at}")]
    DuplicateDock { name: String, at: Position },

    #[error("invalid house dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    /// The agent tried to drive into a wall.
    #[error("vacuum drove into a wall at {0}")]
    WallCollision(Position),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    #[must_use]
    pub fn house_parse(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::HouseParse {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
