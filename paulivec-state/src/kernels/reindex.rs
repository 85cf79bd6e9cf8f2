//! Subsystem relabeling and conditioned block extraction
//!
//! [`swap_subsystems`] exchanges the digit pairs of two qubits in every
//! address. This is a pure relabeling of the subsystem order, not a
//! physical SWAP gate (that is a transfer-matrix application). It is generic over the
//! element type because the complex and Pauli layouts share the
//! two-bits-per-qubit addressing.

use crate::error::{KernelError, Result};
use num_complex::Complex64;
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;

/// Exchange the logical positions of two qubits, in place
///
/// Each address pair is swapped exactly once: the lower address pulls from
/// the higher.
///
/// # Errors
/// Returns an error if the buffer is not `4^n` entries or an index is out
/// of bounds.
pub fn swap_subsystems<T: Copy>(state: &mut [T], sub_a: usize, sub_b: usize) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    for qubit in [sub_a, sub_b] {
        if qubit >= num_qubits {
            return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
        }
    }
    if sub_a == sub_b {
        return Ok(());
    }

    let shift_a = address::pauli_shift(num_qubits, sub_a);
    let shift_b = address::pauli_shift(num_qubits, sub_b);
    for addr in 0..state.len() {
        let digit_a = (addr >> shift_a) & 0b11;
        let digit_b = (addr >> shift_b) & 0b11;
        if digit_a != digit_b {
            let other = addr & !(0b11 << shift_a) & !(0b11 << shift_b)
                | (digit_b << shift_a)
                | (digit_a << shift_b);
            if other > addr {
                state.swap(addr, other);
            }
        }
    }
    Ok(())
}

/// Extract the diagonal sub-block with one qubit held at `value`
///
/// Copies every entry whose chosen qubit has row and column bits equal to
/// `value` into `out`, with that qubit's digit pair removed from the
/// address. The result is the unnormalized conditioned density matrix after
/// a projective event.
///
/// # Errors
/// Returns an error if shapes disagree, the qubit is out of bounds, or
/// `value` is not 0 or 1.
pub fn dm_reduce(
    state: &[Complex64],
    qubit: usize,
    value: usize,
    out: &mut [Complex64],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    if qubit >= num_qubits {
        return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
    }
    if value > 1 {
        return Err(KernelError::LengthMismatch {
            expected: 1,
            actual: value,
        });
    }
    if out.len() != state.len() >> 2 {
        return Err(KernelError::LengthMismatch {
            expected: state.len() >> 2,
            actual: out.len(),
        });
    }

    let shift = address::pauli_shift(num_qubits, qubit);
    // digit 0b00 for value 0, 0b11 for value 1
    let digit = if value == 1 { 0b11 } else { 0b00 };

    if use_parallel && out.len() >= parallel_threshold {
        out.par_iter_mut().enumerate().for_each(|(packed, entry)| {
            *entry = state[address::one_hole_base(packed, shift) | (digit << shift)];
        });
    } else {
        for (packed, entry) in out.iter_mut().enumerate() {
            *entry = state[address::one_hole_base(packed, shift) | (digit << shift)];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_is_an_involution() {
        let original: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let mut state = original.clone();
        swap_subsystems(&mut state, 0, 2).unwrap();
        assert_ne!(state, original);
        swap_subsystems(&mut state, 0, 2).unwrap();
        assert_eq!(state, original);

        swap_subsystems(&mut state, 1, 2).unwrap();
        swap_subsystems(&mut state, 2, 1).unwrap();
        assert_eq!(state, original);
    }

    #[test]
    fn swap_relabels_every_address() {
        let mut state: Vec<f64> = (0..16).map(|i| i as f64).collect();
        swap_subsystems(&mut state, 0, 1).unwrap();
        for addr in 0..16 {
            let swapped = ((addr & 0b11) << 2) | (addr >> 2);
            assert_eq!(state[addr], swapped as f64);
        }
    }

    #[test]
    fn swap_on_complex_entries() {
        let mut state: Vec<Complex64> =
            (0..16).map(|i| Complex64::new(i as f64, -(i as f64))).collect();
        swap_subsystems(&mut state, 0, 1).unwrap();
        assert_eq!(state[0b0001].re, 0b0100 as f64);
        assert_eq!(state[0b0100].re, 0b0001 as f64);
    }

    #[test]
    fn reduce_extracts_conditioned_block() {
        // 2-qubit state, every entry tagged by its address
        let state: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut out = vec![Complex64::new(0.0, 0.0); 4];
        // condition qubit 0 on value 1: addresses 0b11xx
        dm_reduce(&state, 0, 1, &mut out, false, usize::MAX).unwrap();
        let expected: Vec<f64> = (0b1100..0b10000).map(|i| i as f64).collect();
        for (entry, want) in out.iter().zip(&expected) {
            assert_eq!(entry.re, *want);
        }

        // condition qubit 1 on value 0: addresses 0bxx00
        dm_reduce(&state, 1, 0, &mut out, false, usize::MAX).unwrap();
        for (packed, entry) in out.iter().enumerate() {
            assert_eq!(entry.re, (packed << 2) as f64);
        }
    }
}
