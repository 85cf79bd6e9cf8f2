//! General transfer-matrix application
//!
//! Handles arbitrary subsystem dimensions (mixed-radix Pauli addresses) and
//! unequal input/output dimensions for up to two simultaneous targets. The
//! input and output are distinct borrows, so the aliasing hazard the square
//! fast paths avoid by tiling cannot arise here at all; diagonal matrices
//! that want a shared buffer go through
//! [`crate::kernels::diagonal::apply_ptm_diagonal`] instead.

use crate::error::{KernelError, Result};
use crate::ptm::Ptm;
use paulivec_core::address;
use rayon::prelude::*;
use smallvec::SmallVec;

/// Per-subsystem Pauli dimensions of the output state
///
/// Equal to `pauli_dims` with every target's dimension replaced by the
/// PTM's declared output dimension.
///
/// # Errors
/// Returns an error if the target list does not match the PTM, a target is
/// out of range or repeated, or a target's input dimension disagrees with
/// the declared one.
pub fn output_pauli_dims(
    ptm: &Ptm,
    targets: &[usize],
    pauli_dims: &[usize],
) -> Result<SmallVec<[usize; 8]>> {
    if targets.len() != ptm.num_targets() {
        return Err(KernelError::TargetCountMismatch {
            expected: ptm.num_targets(),
            actual: targets.len(),
        });
    }
    let mut out: SmallVec<[usize; 8]> = SmallVec::from_slice(pauli_dims);
    for (slot, &target) in targets.iter().enumerate() {
        if target >= pauli_dims.len() {
            return Err(KernelError::QubitOutOfBounds {
                qubit: target,
                num_qubits: pauli_dims.len(),
            });
        }
        if targets[..slot].contains(&target) {
            return Err(KernelError::DuplicateTarget { qubit: target });
        }
        if pauli_dims[target] != ptm.dim_in(slot) {
            return Err(KernelError::PtmShapeMismatch {
                rows: ptm.rows(),
                cols: ptm.cols(),
                expected_rows: ptm.dim_out(slot),
                expected_cols: pauli_dims[target],
            });
        }
        out[target] = ptm.dim_out(slot);
    }
    Ok(out)
}

/// Apply a general PTM to one or two subsystems of a Pauli-form state
///
/// Contracts `output[bystanders, a_out, b_out] =
/// Σ ptm[a_out·db_out + b_out, a_in·db_in + b_in] ·
/// input[bystanders, a_in, b_in]` over mixed-radix addresses. The output
/// buffer must be sized per [`output_pauli_dims`]; for square PTMs on qubit
/// targets the specialized kernels are the faster choice.
///
/// # Errors
///
/// Returns an error on any shape disagreement between `ptm`, `targets`,
/// `pauli_dims` and the two buffers.
pub fn apply_ptm_general(
    ptm: &Ptm,
    targets: &[usize],
    input: &[f64],
    output: &mut [f64],
    pauli_dims: &[usize],
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    let out_dims = output_pauli_dims(ptm, targets, pauli_dims)?;
    let in_len: usize = pauli_dims.iter().product();
    let out_len: usize = out_dims.iter().product();
    if input.len() != in_len {
        return Err(KernelError::LengthMismatch {
            expected: in_len,
            actual: input.len(),
        });
    }
    if output.len() != out_len {
        return Err(KernelError::LengthMismatch {
            expected: out_len,
            actual: output.len(),
        });
    }

    let in_strides = address::pauli_strides(pauli_dims);
    let target_a = targets[0];
    let target_b = targets.get(1).copied();
    let db_in = target_b.map_or(1, |_| ptm.dim_in(1));
    let db_out = target_b.map_or(1, |_| ptm.dim_out(1));
    let da_in = ptm.dim_in(0);

    let contract = |out_addr: usize| -> f64 {
        let digits = address::pauli_digits(out_addr, &out_dims);
        let a_out = digits[target_a];
        let b_out = target_b.map_or(0, |t| digits[t]);
        // bystander part of the input address
        let mut base = 0;
        for (subsystem, &digit) in digits.iter().enumerate() {
            if subsystem != target_a && Some(subsystem) != target_b {
                base += digit * in_strides[subsystem];
            }
        }
        let row = a_out * db_out + b_out;
        let stride_a = in_strides[target_a];
        let stride_b = target_b.map_or(0, |t| in_strides[t]);
        let mut acc = 0.0;
        for a_in in 0..da_in {
            for b_in in 0..db_in {
                let col = a_in * db_in + b_in;
                acc += ptm.at(row, col) * input[base + a_in * stride_a + b_in * stride_b];
            }
        }
        acc
    };

    if use_parallel && out_len >= parallel_threshold {
        output
            .par_iter_mut()
            .enumerate()
            .for_each(|(addr, out)| *out = contract(addr));
    } else {
        for (addr, out) in output.iter_mut().enumerate() {
            *out = contract(addr);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::single::apply_ptm_single;
    use crate::kernels::two::apply_ptm_two;
    use crate::ptm::{common, kron};
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_is_a_copy() {
        let input: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let mut output = vec![0.0; 64];
        let dims = [4usize; 3];
        apply_ptm_general(
            &Ptm::identity(4),
            &[1],
            &input,
            &mut output,
            &dims,
            false,
            usize::MAX,
        )
        .unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn agrees_with_single_fast_path() {
        let input: Vec<f64> = (0..64).map(|i| (0.1 * i as f64).sin()).collect();
        let ptm = common::amplitude_damping(0.4);
        let dims = [4usize; 3];

        let mut general = vec![0.0; 64];
        apply_ptm_general(
            &Ptm::from_single(&ptm),
            &[2],
            &input,
            &mut general,
            &dims,
            false,
            usize::MAX,
        )
        .unwrap();

        let mut fast = input;
        apply_ptm_single(&ptm, 2, &mut fast, false, usize::MAX).unwrap();
        for (a, b) in general.iter().zip(&fast) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn agrees_with_two_fast_path() {
        let input: Vec<f64> = (0..256).map(|i| (0.2 * i as f64).cos()).collect();
        let ptm = kron(&common::rotate_x(0.5), &common::bit_flip());
        let dims = [4usize; 4];

        let mut general = vec![0.0; 256];
        apply_ptm_general(
            &Ptm::from_two(&ptm),
            &[3, 1],
            &input,
            &mut general,
            &dims,
            true,
            0,
        )
        .unwrap();

        let mut fast = input;
        apply_ptm_two(&ptm, 3, 1, &mut fast, false, usize::MAX).unwrap();
        for (a, b) in general.iter().zip(&fast) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn projects_onto_computational_subbasis() {
        // keep only the diagonal digits {0, 3} of qubit 0: a 2x4 PTM
        let project = Ptm::single(
            vec![
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
            2,
            4,
        )
        .unwrap();
        let input: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let dims = [4usize, 4];
        let out_dims = output_pauli_dims(&project, &[0], &dims).unwrap();
        assert_eq!(out_dims.as_slice(), &[2, 4]);

        let mut output = vec![0.0; 8];
        apply_ptm_general(&project, &[0], &input, &mut output, &dims, false, usize::MAX).unwrap();
        // first four outputs are digit 0, next four are digit 3
        assert_eq!(&output[..4], &input[..4]);
        assert_eq!(&output[4..], &input[12..16]);
    }

    #[test]
    fn rejects_mismatched_dims() {
        let input = vec![0.0; 16];
        let mut output = vec![0.0; 16];
        let err = apply_ptm_general(
            &Ptm::identity(9),
            &[0],
            &input,
            &mut output,
            &[4, 4],
            false,
            usize::MAX,
        );
        assert!(matches!(err, Err(KernelError::PtmShapeMismatch { .. })));
    }
}
