//! Two-qubit transfer-matrix application
//!
//! The 16×16 fast path. The bystander index is split around the two target
//! digit positions (the low/mid/high decomposition in
//! [`paulivec_core::address::two_hole_base`]) so each bystander owns a
//! 16-element tile; the tile is loaded before any store, so the update is
//! safe in place.

use crate::error::{KernelError, Result};
use crate::ptm::Ptm16;
use paulivec_core::{address, qubit_count};
use rayon::prelude::*;

/// Apply a 16×16 PTM to a qubit pair of a Pauli-form state, in place
///
/// The PTM row/column index is packed `a·4 + b` where `a` is the digit of
/// `qubit_a` and `b` the digit of `qubit_b`.
///
/// # Errors
///
/// Returns an error if the buffer is not `4^n` entries, either qubit index
/// is out of bounds, or the two targets coincide.
pub fn apply_ptm_two(
    ptm: &Ptm16,
    qubit_a: usize,
    qubit_b: usize,
    state: &mut [f64],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let num_qubits = qubit_count(state.len())?;
    for qubit in [qubit_a, qubit_b] {
        if qubit >= num_qubits {
            return Err(KernelError::QubitOutOfBounds { qubit, num_qubits });
        }
    }
    if qubit_a == qubit_b {
        return Err(KernelError::DuplicateTarget { qubit: qubit_a });
    }

    let shift_a = address::pauli_shift(num_qubits, qubit_a);
    let shift_b = address::pauli_shift(num_qubits, qubit_b);
    let (shift_lo, shift_hi) = if shift_a < shift_b {
        (shift_a, shift_b)
    } else {
        (shift_b, shift_a)
    };
    let span = 1usize << (shift_hi + 2);

    if use_parallel && state.len() >= parallel_threshold {
        state.par_chunks_mut(span).for_each(|chunk| {
            apply_in_block(ptm, chunk, shift_a, shift_b, shift_lo, shift_hi);
        });
    } else {
        for chunk in state.chunks_mut(span) {
            apply_in_block(ptm, chunk, shift_a, shift_b, shift_lo, shift_hi);
        }
    }
    Ok(())
}

/// Contract one span: every bystander combination below the higher digit
#[inline]
fn apply_in_block(
    ptm: &Ptm16,
    block: &mut [f64],
    shift_a: u32,
    shift_b: u32,
    shift_lo: u32,
    shift_hi: u32,
) {
    let bystanders = block.len() >> 4;
    let mut tile = [0.0; 16];
    for packed in 0..bystanders {
        let base = address::two_hole_base(packed, shift_lo, shift_hi);
        for a in 0..4 {
            for b in 0..4 {
                tile[a * 4 + b] = block[base | (a << shift_a) | (b << shift_b)];
            }
        }
        for a in 0..4 {
            for b in 0..4 {
                let row = &ptm[a * 4 + b];
                let mut acc = 0.0;
                for (input, &coeff) in tile.iter().enumerate() {
                    acc += row[input] * coeff;
                }
                block[base | (a << shift_a) | (b << shift_b)] = acc;
            }
        }
    }
}
