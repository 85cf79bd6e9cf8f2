//! Error types for dimension and addressing checks

use thiserror::Error;

/// Errors that can occur while building dimension vectors or addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid subsystem index
    #[error("Invalid subsystem index {index} for {num_subsystems}-subsystem state")]
    InvalidSubsystem {
        index: usize,
        num_subsystems: usize,
    },

    /// Invalid subsystem dimension
    #[error("Invalid subsystem dimension {dim}, must be at least 2")]
    InvalidDimension { dim: usize },

    /// State does not fit in addressable memory
    #[error("State over {num_subsystems} subsystems needs {requested} coefficients, which exceeds addressable memory")]
    StateTooLarge {
        num_subsystems: usize,
        requested: u128,
    },

    /// Buffer length does not match the declared dimensions
    #[error("Buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
