//! Error types for kernel operations

use paulivec_core::CoreError;
use thiserror::Error;

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors that can occur while applying kernels to a state buffer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Qubit index out of bounds
    #[error("Qubit index {qubit} out of bounds for {num_qubits}-qubit state")]
    QubitOutOfBounds { qubit: usize, num_qubits: usize },

    /// The same subsystem was named twice as a target
    #[error("Target subsystems must be distinct, got {qubit} twice")]
    DuplicateTarget { qubit: usize },

    /// Buffer length does not match the declared shape
    #[error("Buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Number of named targets does not match the transfer matrix
    #[error("Transfer matrix acts on {expected} target(s), got {actual}")]
    TargetCountMismatch { expected: usize, actual: usize },

    /// Transfer matrix shape does not match the targeted subsystems
    #[error("Transfer matrix of shape {rows}x{cols} does not match target dimensions {expected_rows}x{expected_cols}")]
    PtmShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    /// Index map is malformed
    #[error("Invalid index map: {reason}")]
    InvalidIndexMap { reason: String },

    /// Addressing or dimension error
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
