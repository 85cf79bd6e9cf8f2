//! Transfer-matrix, reduction, reindexing and gather kernels
//!
//! Every kernel borrows caller-owned buffers for the duration of one call
//! and runs to completion; the caller sequences dependent operations. Dense
//! kernels take `use_parallel` / `parallel_threshold` and choose between a
//! rayon path and a sequential path.

pub mod diagonal;
pub mod gather;
pub mod general;
pub mod reduce;
pub mod reindex;
pub mod single;
pub mod two;

pub use diagonal::apply_ptm_diagonal;
pub use gather::{multitake, IndexMap};
pub use general::{apply_ptm_general, output_pauli_dims};
pub use reduce::{get_diag, partial_trace, trace};
pub use reindex::{dm_reduce, swap_subsystems};
pub use single::apply_ptm_single;
pub use two::apply_ptm_two;
