//! Density-matrix kernels over the Pauli representation
//!
//! This crate is the computational core of a density-matrix simulator: it
//! converts between the complex and Pauli layouts, applies Pauli transfer
//! matrices to one or two subsystems (with an arbitrary-dimension general
//! path), extracts diagonals and traces, relabels subsystems, and gathers
//! arbitrary index patterns.
//!
//! The state buffer is owned by the caller and mutably borrowed by one
//! kernel call at a time; [`PauliVector`] is a convenience owner for the
//! common case. Dense kernels choose between a rayon path and a sequential
//! path via `use_parallel` / `parallel_threshold` arguments.
//!
//! # Example
//! ```
//! use paulivec_state::{ptm::common, PauliVector};
//!
//! let mut state = PauliVector::new(2).unwrap();
//! state.apply_single(&common::bit_flip(), 0).unwrap();
//! let (stayed, flipped) = state.partial_trace(0).unwrap();
//! assert!(stayed.abs() < 1e-12 && (flipped - 1.0).abs() < 1e-12);
//! ```

pub mod basis;
pub mod error;
pub mod kernels;
pub mod pauli_vector;
pub mod ptm;

pub use basis::{bit_to_pauli_basis, pauli_reshuffle, ReshuffleDirection};
pub use error::{KernelError, Result};
pub use kernels::{
    apply_ptm_diagonal, apply_ptm_general, apply_ptm_single, apply_ptm_two, dm_reduce, get_diag,
    multitake, output_pauli_dims, partial_trace, swap_subsystems, trace, IndexMap,
};
pub use pauli_vector::{KernelConfig, PauliVector};
pub use ptm::{kron, DiagonalPtm, Ptm, Ptm16, Ptm4};
