//! Conversion between the complex and Pauli layouts
//!
//! The complex layout stores the density matrix entry `(row, col)` at the
//! bit-interleaved address; the Pauli layout stores real coefficients over
//! the basis described in [`paulivec_core::basis`]. Conversion runs in two
//! stages:
//!
//! 1. [`bit_to_pauli_basis`], once per qubit: mixes the two off-diagonal
//!    entries of that qubit's sub-blocks into their sum and difference over
//!    √2, in place. An involution.
//! 2. [`pauli_reshuffle`]: copies between the mixed complex array and the
//!    real Pauli array. With the digit convention used here the address map
//!    is the identity; what remains is component selection and a sign.
//!
//! The sign rule is derived from stage 1 rather than postulated: after
//! mixing, the slot with digit 2 on a qubit holds `(ρ01 − ρ10)/√2`, which is
//! `−i` times the real coefficient of `Y/√2`. An address with `y` Y-like
//! digits therefore stores `coeff · (−i)^y`: the coefficient sits in the
//! real component for even `y` and the imaginary component for odd `y`, with
//! a sign flip exactly when `y mod 4` is 1 or 2.

use crate::error::{KernelError, Result};
use num_complex::Complex64;
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;
use std::f64::consts::FRAC_1_SQRT_2;

/// Copy direction for [`pauli_reshuffle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReshuffleDirection {
    /// Read the mixed complex array, write the real Pauli array
    ComplexToPauli,
    /// Read the real Pauli array, write the mixed complex array
    PauliToComplex,
}

/// Mix one qubit's off-diagonal sub-blocks into sum/difference pairs
///
/// For every address pair `(base | colbit, base | rowbit)` of the chosen
/// qubit, replaces `(u, v)` with `((u + v)/√2, (u − v)/√2)`. Entries whose
/// row and column bits agree are untouched. Applying this twice to the same
/// qubit restores the original state.
///
/// # Errors
/// Returns an error if the buffer is not `4^n` entries or the qubit index is
/// out of range.
pub fn bit_to_pauli_basis(
    state: &mut [Complex64],
    qubit: usize,
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    if qubit >= num_qubits {
        return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
    }

    let col = address::col_bit(num_qubits, qubit);
    let span = 1usize << (col + 2);

    if use_parallel && state.len() >= parallel_threshold {
        state
            .par_chunks_mut(span)
            .for_each(|chunk| mix_block(chunk, col));
    } else {
        for chunk in state.chunks_mut(span) {
            mix_block(chunk, col);
        }
    }
    Ok(())
}

/// Mix every off-diagonal pair within one span of the target qubit
#[inline]
fn mix_block(block: &mut [Complex64], col: u32) {
    let stride = 1usize << col;
    for base in 0..stride {
        let lo = base | stride; // column bit set
        let hi = base | (stride << 1); // row bit set
        let u = block[lo];
        let v = block[hi];
        block[lo] = (u + v) * FRAC_1_SQRT_2;
        block[hi] = (u - v) * FRAC_1_SQRT_2;
    }
}

/// Number of Y-like digits (bit pair `10`) in an address
#[inline]
fn count_y_digits(addr: usize, num_qubits: usize) -> u32 {
    let mut count = 0;
    let mut rest = addr;
    for _ in 0..num_qubits {
        if rest & 0b11 == 0b10 {
            count += 1;
        }
        rest >>= 2;
    }
    count
}

/// Component selector and sign for one address: `(take_imaginary, sign)`
#[inline]
fn component_and_sign(addr: usize, num_qubits: usize) -> (bool, f64) {
    let y = count_y_digits(addr, num_qubits);
    let imag = y & 1 == 1;
    let sign = if matches!(y % 4, 1 | 2) { -1.0 } else { 1.0 };
    (imag, sign)
}

/// Copy between the mixed complex layout and the real Pauli layout
///
/// Both buffers have `4^n` entries and identical addressing; the transfer
/// selects the live component per address and applies the sign correction
/// derived in the module docs. The two directions are exact inverses for
/// any state whose complex form came from a Hermitian density matrix.
///
/// # Errors
/// Returns an error if the buffer lengths differ or are not a power of four.
pub fn pauli_reshuffle(
    complex: &mut [Complex64],
    pauli: &mut [f64],
    direction: ReshuffleDirection,
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(complex.len())?;
    if pauli.len() != complex.len() {
        return Err(KernelError::LengthMismatch {
            expected: complex.len(),
            actual: pauli.len(),
        });
    }

    let parallel = use_parallel && pauli.len() >= parallel_threshold;
    match direction {
        ReshuffleDirection::ComplexToPauli => {
            let src = &*complex;
            if parallel {
                pauli.par_iter_mut().enumerate().for_each(|(addr, out)| {
                    *out = read_component(src[addr], addr, num_qubits);
                });
            } else {
                for (addr, out) in pauli.iter_mut().enumerate() {
                    *out = read_component(src[addr], addr, num_qubits);
                }
            }
        }
        ReshuffleDirection::PauliToComplex => {
            let src = &*pauli;
            if parallel {
                complex.par_iter_mut().enumerate().for_each(|(addr, out)| {
                    *out = write_component(src[addr], addr, num_qubits);
                });
            } else {
                for (addr, out) in complex.iter_mut().enumerate() {
                    *out = write_component(src[addr], addr, num_qubits);
                }
            }
        }
    }
    Ok(())
}

/// Extract the real Pauli coefficient from a mixed complex entry
#[inline]
fn read_component(value: Complex64, addr: usize, num_qubits: usize) -> f64 {
    let (imag, sign) = component_and_sign(addr, num_qubits);
    sign * if imag { value.im } else { value.re }
}

/// Place a real Pauli coefficient into the live component of a complex entry
#[inline]
fn write_component(coeff: f64, addr: usize, num_qubits: usize) -> Complex64 {
    let (imag, sign) = component_and_sign(addr, num_qubits);
    let value = sign * coeff;
    if imag {
        Complex64::new(0.0, value)
    } else {
        Complex64::new(value, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ground_state(num_qubits: usize) -> Vec<Complex64> {
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << (2 * num_qubits)];
        state[0] = Complex64::new(1.0, 0.0);
        state
    }

    #[test]
    fn mixing_is_an_involution() {
        // |+⟩⟨+| on one qubit: all four entries 1/2
        let mut state = vec![Complex64::new(0.5, 0.0); 4];
        let original = state.clone();
        bit_to_pauli_basis(&mut state, 0, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(state[1].re, 0.5 * 2.0 * FRAC_1_SQRT_2, epsilon = 1e-15);
        assert_abs_diff_eq!(state[2].re, 0.0, epsilon = 1e-15);
        bit_to_pauli_basis(&mut state, 0, false, usize::MAX).unwrap();
        for (got, want) in state.iter().zip(&original) {
            assert_abs_diff_eq!(got.re, want.re, epsilon = 1e-15);
            assert_abs_diff_eq!(got.im, want.im, epsilon = 1e-15);
        }
    }

    #[test]
    fn diagonal_entries_are_untouched() {
        let mut state = ground_state(2);
        bit_to_pauli_basis(&mut state, 0, false, usize::MAX).unwrap();
        bit_to_pauli_basis(&mut state, 1, false, usize::MAX).unwrap();
        assert_abs_diff_eq!(state[0].re, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn y_digit_count() {
        assert_eq!(count_y_digits(0b10, 1), 1);
        assert_eq!(count_y_digits(0b1010, 2), 2);
        assert_eq!(count_y_digits(0b0110, 2), 1);
        assert_eq!(count_y_digits(0b1111, 2), 0);
    }

    #[test]
    fn reshuffle_ground_state() {
        let mut complex = ground_state(2);
        let mut pauli = vec![0.0; 16];
        pauli_reshuffle(
            &mut complex,
            &mut pauli,
            ReshuffleDirection::ComplexToPauli,
            false,
            usize::MAX,
        )
        .unwrap();
        assert_abs_diff_eq!(pauli[0], 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(pauli[1..].iter().map(|v| v.abs()).sum::<f64>(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn reshuffle_roundtrip_on_y_component() {
        // coefficient 1 on the Y digit of qubit 0 in a 1-qubit state
        let mut pauli = vec![0.0; 4];
        pauli[2] = 1.0;
        let mut complex = vec![Complex64::new(0.0, 0.0); 4];
        pauli_reshuffle(
            &mut complex,
            &mut pauli,
            ReshuffleDirection::PauliToComplex,
            false,
            usize::MAX,
        )
        .unwrap();
        // (ρ01 − ρ10)/√2 = −i for Y/√2
        assert_abs_diff_eq!(complex[2].im, -1.0, epsilon = 1e-15);
        let mut back = vec![0.0; 4];
        pauli_reshuffle(
            &mut complex,
            &mut back,
            ReshuffleDirection::ComplexToPauli,
            false,
            usize::MAX,
        )
        .unwrap();
        assert_abs_diff_eq!(back[2], 1.0, epsilon = 1e-15);
    }
}
