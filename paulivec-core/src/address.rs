//! Address arithmetic for the complex and Pauli layouts
//!
//! Every kernel in the workspace goes through these functions; address math
//! is never duplicated inline. Both layouts interleave per-subsystem digits
//! with subsystem 0 most significant:
//!
//! - complex form: qubit `k` contributes its row bit at position
//!   `2(n-1-k)+1` and its column bit at position `2(n-1-k)`;
//! - Pauli form: qubit `k` contributes one base-4 digit at position
//!   `2(n-1-k)`; for qudits the digit has radix `d_k²` and the address is
//!   mixed-radix.
//!
//! Diagonal entries (`row == col`) occupy the same addresses in both
//! layouts, since the digit encoding is the (row, col) bit pair.

use crate::dims::strides;
use smallvec::SmallVec;

/// Bit position of a qubit's Pauli digit (and of its column bit in the
/// complex layout)
#[inline]
pub fn pauli_shift(num_qubits: usize, qubit: usize) -> u32 {
    (2 * (num_qubits - 1 - qubit)) as u32
}

/// Bit position of a qubit's row bit in the complex layout
#[inline]
pub fn row_bit(num_qubits: usize, qubit: usize) -> u32 {
    pauli_shift(num_qubits, qubit) + 1
}

/// Bit position of a qubit's column bit in the complex layout
#[inline]
pub fn col_bit(num_qubits: usize, qubit: usize) -> u32 {
    pauli_shift(num_qubits, qubit)
}

/// Complex-layout address of entry `(row, col)`
///
/// `row` and `col` are `num_qubits`-bit outcome indices, subsystem 0 most
/// significant.
#[inline]
pub fn interleave_complex(row: usize, col: usize, num_qubits: usize) -> usize {
    let mut addr = 0;
    for pos in 0..num_qubits {
        addr |= ((row >> pos) & 1) << (2 * pos + 1);
        addr |= ((col >> pos) & 1) << (2 * pos);
    }
    addr
}

/// Inverse of [`interleave_complex`]
#[inline]
pub fn deinterleave_complex(addr: usize, num_qubits: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for pos in 0..num_qubits {
        row |= ((addr >> (2 * pos + 1)) & 1) << pos;
        col |= ((addr >> (2 * pos)) & 1) << pos;
    }
    (row, col)
}

/// Address of the diagonal entry for a joint outcome
///
/// Sets both bits of every subsystem's pair to the outcome bit, which is
/// also the Pauli-form address of the corresponding projector component
/// (digit 0 or 3 per qubit).
#[inline]
pub fn diagonal_address(outcome: usize, num_qubits: usize) -> usize {
    let mut addr = 0;
    for pos in 0..num_qubits {
        if (outcome >> pos) & 1 == 1 {
            addr |= 0b11 << (2 * pos);
        }
    }
    addr
}

/// Mixed-radix Pauli address from per-subsystem digits
///
/// `pauli_dims` are the per-subsystem digit radixes (`d_i²` for a full
/// basis), subsystem 0 most significant.
pub fn pauli_address(digits: &[usize], pauli_dims: &[usize]) -> usize {
    debug_assert_eq!(digits.len(), pauli_dims.len());
    let mut addr = 0;
    for (digit, dim) in digits.iter().zip(pauli_dims) {
        debug_assert!(digit < dim);
        addr = addr * dim + digit;
    }
    addr
}

/// Inverse of [`pauli_address`]
pub fn pauli_digits(addr: usize, pauli_dims: &[usize]) -> SmallVec<[usize; 8]> {
    let mut digits = SmallVec::from_elem(0, pauli_dims.len());
    let mut rest = addr;
    for (slot, &dim) in digits.iter_mut().zip(pauli_dims).rev() {
        *slot = rest % dim;
        rest /= dim;
    }
    debug_assert_eq!(rest, 0);
    digits
}

/// Row-major strides for per-subsystem Pauli dimensions
pub fn pauli_strides(pauli_dims: &[usize]) -> SmallVec<[usize; 8]> {
    strides(pauli_dims)
}

/// Open one 2-bit hole at `shift` in a packed bystander index
///
/// Bits of `bystander` below `shift` stay in place; the rest move up by two.
#[inline]
pub fn one_hole_base(bystander: usize, shift: u32) -> usize {
    let low = bystander & ((1 << shift) - 1);
    let high = bystander >> shift;
    low | (high << (shift + 2))
}

/// Open two 2-bit holes at `shift_lo < shift_hi` in a packed bystander index
///
/// This is the low/mid/high decomposition used by the two-qubit applicator:
/// the bystander bits are split around the two target digit positions and
/// recomposed with both holes cleared.
#[inline]
pub fn two_hole_base(bystander: usize, shift_lo: u32, shift_hi: u32) -> usize {
    debug_assert!(shift_lo + 2 <= shift_hi);
    let low = bystander & ((1 << shift_lo) - 1);
    let mid = (bystander >> shift_lo) & ((1 << (shift_hi - shift_lo - 2)) - 1);
    let high = bystander >> (shift_hi - 2);
    low | (mid << (shift_lo + 2)) | (high << (shift_hi + 2))
}
