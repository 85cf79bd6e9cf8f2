//! Core types for the paulivec density-matrix kernels
//!
//! This crate provides the pieces the kernel layer builds on:
//! - [`Dims`]: subsystem dimension vectors with checked sizing
//! - [`address`]: the bit/digit interleaving scheme of both state layouts
//! - [`PauliBasis`]: the per-subsystem basis the Pauli form expands over
//! - [`CoreError`]: error type for dimension and addressing checks
//!
//! # Example
//! ```
//! use paulivec_core::{address, Dims};
//!
//! let dims = Dims::qubits(2).unwrap();
//! assert_eq!(dims.pauli_len(), 16);
//! // entry (row=1, col=3) of the 2-qubit density matrix
//! assert_eq!(address::interleave_complex(0b01, 0b11, 2), 0b0111);
//! ```

pub mod address;
pub mod basis;
pub mod dims;
pub mod error;

pub use basis::{ElementKind, PauliBasis};
pub use dims::{qubit_count, Dims};
pub use error::{CoreError, Result};
