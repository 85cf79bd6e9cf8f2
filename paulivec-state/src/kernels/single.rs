//! Single-qubit transfer-matrix application
//!
//! The 4×4 fast path. Each bystander combination owns a 4-element tile
//! (the target qubit's Pauli digit); the tile is loaded before any store,
//! so the update is safe in place.

use crate::error::{KernelError, Result};
use crate::ptm::Ptm4;
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;

/// Apply a 4×4 PTM to one qubit of a Pauli-form state, in place
///
/// # Arguments
///
/// * `ptm` - The 4×4 transfer matrix
/// * `qubit` - Index of the target qubit (0 is most significant)
/// * `state` - Pauli-form coefficients, length `4^n`
/// * `use_parallel` - Whether to use parallel execution
/// * `parallel_threshold` - Minimum state size for parallel execution
///
/// # Errors
///
/// Returns an error if the buffer is not `4^n` entries or the qubit index
/// is out of bounds.
pub fn apply_ptm_single(
    ptm: &Ptm4,
    qubit: usize,
    state: &mut [f64],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    if qubit >= num_qubits {
        return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
    }

    let shift = address::pauli_shift(num_qubits, qubit);
    let span = 1usize << (shift + 2);

    if use_parallel && state.len() >= parallel_threshold {
        state
            .par_chunks_mut(span)
            .for_each(|chunk| apply_in_block(ptm, chunk, shift));
    } else {
        for chunk in state.chunks_mut(span) {
            apply_in_block(ptm, chunk, shift);
        }
    }
    Ok(())
}

/// Contract one span: every bystander offset below the target digit
#[inline]
fn apply_in_block(ptm: &Ptm4, block: &mut [f64], shift: u32) {
    let stride = 1usize << shift;
    for low in 0..stride {
        let tile = [
            block[low],
            block[low + stride],
            block[low + 2 * stride],
            block[low + 3 * stride],
        ];
        for (out, row) in ptm.iter().enumerate() {
            block[low + out * stride] =
                row[0] * tile[0] + row[1] * tile[1] + row[2] * tile[2] + row[3] * tile[3];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptm::common;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_leaves_state_unchanged() {
        let state: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let mut out = state.clone();
        for qubit in 0..3 {
            apply_ptm_single(&common::identity4(), qubit, &mut out, false, usize::MAX).unwrap();
        }
        assert_eq!(state, out);
    }

    #[test]
    fn bit_flip_moves_ground_population() {
        // two qubits, ground state
        let mut state = vec![0.0; 16];
        state[0] = 1.0;
        apply_ptm_single(&common::bit_flip(), 1, &mut state, false, usize::MAX).unwrap();
        // qubit 1 digit moves 0 -> 3
        assert_abs_diff_eq!(state[3], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state[0], 0.0, epsilon = 1e-15);

        let mut state = vec![0.0; 16];
        state[0] = 1.0;
        apply_ptm_single(&common::bit_flip(), 0, &mut state, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(state[3 << 2], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn parallel_matches_sequential() {
        let state: Vec<f64> = (0..256).map(|i| (i as f64).sin()).collect();
        let ptm = common::rotate_x(0.4);
        let mut seq = state.clone();
        let mut par = state;
        apply_ptm_single(&ptm, 2, &mut seq, false, usize::MAX).unwrap();
        apply_ptm_single(&ptm, 2, &mut par, true, 0).unwrap();
        for (a, b) in seq.iter().zip(&par) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut state = vec![0.0; 16];
        assert!(matches!(
            apply_ptm_single(&common::identity4(), 2, &mut state, false, usize::MAX),
            Err(KernelError::QubitOutOfBounds { qubit: 2, .. })
        ));
        let mut odd = vec![0.0; 8];
        assert!(apply_ptm_single(&common::identity4(), 0, &mut odd, false, usize::MAX).is_err());
    }
}
