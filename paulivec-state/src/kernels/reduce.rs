//! Diagonal extraction, trace and partial trace
//!
//! The diagonal of the density matrix lives on the addresses whose digits
//! are all projector digits (0 or 3 per qubit); those addresses and values
//! coincide in the complex and Pauli layouts, so [`get_diag`] reads the
//! Pauli-form buffer the simulation keeps for its lifetime. Sums run as
//! chunked pairwise trees: rayon's join tree supplies the cross-chunk
//! combination, pairwise accumulation bounds floating-point drift within a
//! chunk.

use crate::error::{KernelError, Result};
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;

/// Below this length a sum is accumulated directly
const PAIRWISE_CUTOFF: usize = 32;

/// Extract the unnormalized outcome distribution from a Pauli-form state
///
/// `diag[outcome]` receives the coefficient at the address whose digits are
/// the projectors of that joint outcome.
///
/// # Errors
/// Returns an error if the state is not `4^n` entries or `diag` is not
/// `2^n` entries.
pub fn get_diag(
    state: &[f64],
    diag: &mut [f64],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    if diag.len() != 1 << num_qubits {
        return Err(KernelError::LengthMismatch {
            expected: 1 << num_qubits,
            actual: diag.len(),
        });
    }

    if use_parallel && diag.len() >= parallel_threshold {
        diag.par_iter_mut().enumerate().for_each(|(outcome, out)| {
            *out = state[address::diagonal_address(outcome, num_qubits)];
        });
    } else {
        for (outcome, out) in diag.iter_mut().enumerate() {
            *out = state[address::diagonal_address(outcome, num_qubits)];
        }
    }
    Ok(())
}

/// Pairwise tree sum of one chunk
fn pairwise_sum(values: &[f64]) -> f64 {
    if values.len() <= PAIRWISE_CUTOFF {
        values.iter().sum()
    } else {
        let mid = values.len() / 2;
        pairwise_sum(&values[..mid]) + pairwise_sum(&values[mid..])
    }
}

/// Grand total of a diagonal array
pub fn trace(diag: &[f64], use_parallel: bool, parallel_threshold: usize) -> f64 {
    if use_parallel && diag.len() >= parallel_threshold {
        diag.par_chunks(PAIRWISE_CUTOFF).map(pairwise_sum).sum()
    } else {
        pairwise_sum(diag)
    }
}

/// The two partial sums for one subsystem being 0 or 1
///
/// Merging never crosses the singled-out subsystem's bit: every outcome is
/// routed to the bucket selected by that bit, and the two buckets are
/// reduced independently.
///
/// # Errors
/// Returns an error if `diag` is not a `2^n`-entry array containing the
/// subsystem.
pub fn partial_trace(
    diag: &[f64],
    subsystem: usize,
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<(f64, f64)> {
    let len = diag.len();
    if !len.is_power_of_two() {
        return Err(KernelError::LengthMismatch {
            expected: len.next_power_of_two(),
            actual: len,
        });
    }
    let num_qubits = len.trailing_zeros() as usize;
    if subsystem >= num_qubits {
        return Err(KernelError::QubitOutOfBounds {
            qubit: subsystem,
            num_qubits,
        });
    }

    // subsystem 0 is most significant in the outcome index
    let bit = 1usize << (num_qubits - 1 - subsystem);

    let sums = if use_parallel && len >= parallel_threshold {
        diag.par_iter()
            .enumerate()
            .map(|(outcome, &value)| {
                if outcome & bit == 0 {
                    (value, 0.0)
                } else {
                    (0.0, value)
                }
            })
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
    } else {
        let mut sums = (0.0, 0.0);
        for (outcome, &value) in diag.iter().enumerate() {
            if outcome & bit == 0 {
                sums.0 += value;
            } else {
                sums.1 += value;
            }
        }
        sums
    };
    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn trace_of_pure_ground_state_is_one() {
        // 1-qubit state [1, 0, 0, 0]: all weight on the |0⟩⟨0| component
        let state = [1.0, 0.0, 0.0, 0.0];
        let mut diag = [0.0; 2];
        get_diag(&state, &mut diag, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(trace(&diag, false, usize::MAX), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn diag_picks_projector_digits() {
        let mut state = vec![0.0; 16];
        state[0b0000] = 0.1; // |00⟩
        state[0b0011] = 0.2; // |01⟩
        state[0b1100] = 0.3; // |10⟩
        state[0b1111] = 0.4; // |11⟩
        state[0b0110] = 9.0; // off-diagonal, must be ignored
        let mut diag = vec![0.0; 4];
        get_diag(&state, &mut diag, false, usize::MAX).unwrap();
        assert_eq!(diag, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn partial_sums_add_to_total() {
        let diag: Vec<f64> = (0..64).map(|i| (i as f64) / 64.0).collect();
        let total = trace(&diag, false, usize::MAX);
        for subsystem in 0..6 {
            let (zero, one) = partial_trace(&diag, subsystem, false, usize::MAX).unwrap();
            assert_abs_diff_eq!(zero + one, total, epsilon = 1e-12);
        }
    }

    #[test]
    fn partial_trace_respects_significance_order() {
        // diag over 2 qubits: outcome index is (q0 q1)
        let diag = [0.5, 0.25, 0.125, 0.125];
        let (zero, one) = partial_trace(&diag, 0, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(zero, 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(one, 0.25, epsilon = 1e-15);
        let (zero, one) = partial_trace(&diag, 1, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(zero, 0.625, epsilon = 1e-15);
        assert_abs_diff_eq!(one, 0.375, epsilon = 1e-15);
    }

    #[test]
    fn parallel_reduction_matches_sequential() {
        let diag: Vec<f64> = (0..1024).map(|i| (0.01 * i as f64).sin()).collect();
        assert_abs_diff_eq!(
            trace(&diag, true, 0),
            trace(&diag, false, usize::MAX),
            epsilon = 1e-9
        );
        let (z_par, o_par) = partial_trace(&diag, 3, true, 0).unwrap();
        let (z_seq, o_seq) = partial_trace(&diag, 3, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(z_par, z_seq, epsilon = 1e-9);
        assert_abs_diff_eq!(o_par, o_seq, epsilon = 1e-9);
    }
}
