//! Diagonal transfer-matrix application
//!
//! Pure dephasing and relabeling channels have a diagonal PTM, so every
//! output coefficient depends only on the input coefficient at the same
//! address. This is the one whole-buffer update that is offered in place;
//! non-diagonal matrices must go through the tiled fast paths or the
//! two-buffer general kernel.

use crate::error::{KernelError, Result};
use crate::ptm::DiagonalPtm;
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;

/// Apply a diagonal PTM to one or more qubits, in place
///
/// `ptm` holds `4^k` diagonal entries for `k` target qubits, indexed by the
/// targets' digits packed in the order they are named.
///
/// # Errors
///
/// Returns an error if the buffer is not `4^n` entries, a target is out of
/// bounds or repeated, or the diagonal length does not match the targets.
pub fn apply_ptm_diagonal(
    ptm: &DiagonalPtm,
    targets: &[usize],
    state: &mut [f64],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    for (slot, &qubit) in targets.iter().enumerate() {
        if qubit >= num_qubits {
            return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
        }
        if targets[..slot].contains(&qubit) {
            return Err(KernelError::DuplicateTarget { qubit });
        }
    }
    let expected = 1usize << (2 * targets.len());
    if ptm.dim() != expected {
        return Err(KernelError::LengthMismatch {
            expected,
            actual: ptm.dim(),
        });
    }

    if use_parallel && state.len() >= parallel_threshold {
        state.par_iter_mut().enumerate().for_each(|(addr, value)| {
            *value *= ptm.at(diag_index(addr, targets, num_qubits));
        });
    } else {
        for (addr, value) in state.iter_mut().enumerate() {
            *value *= ptm.at(diag_index(addr, targets, num_qubits));
        }
    }
    Ok(())
}

/// Pack the targets' digits of one address into a diagonal index
#[inline]
fn diag_index(addr: usize, targets: &[usize], num_qubits: usize) -> usize {
    let mut index = 0;
    for &qubit in targets {
        index = (index << 2) | ((addr >> address::pauli_shift(num_qubits, qubit)) & 0b11);
    }
    index
}
