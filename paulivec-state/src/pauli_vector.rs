//! Owning density-matrix state in the Pauli representation
//!
//! The kernels borrow caller-owned buffers; [`PauliVector`] is the caller
//! most programs want: it allocates the Pauli-form buffer once, converts
//! from and to the complex form, and forwards to the kernels with a shared
//! parallelism policy.

use crate::basis::{bit_to_pauli_basis, pauli_reshuffle, ReshuffleDirection};
use crate::error::{KernelError, Result};
use crate::kernels::{
    apply_ptm_diagonal, apply_ptm_general, apply_ptm_single, apply_ptm_two, get_diag,
    partial_trace, swap_subsystems, trace,
};
use crate::ptm::{DiagonalPtm, Ptm, Ptm16, Ptm4};
use num_complex::Complex64;
use paulivec_core::Dims;

/// Parallelism policy for kernel calls made through [`PauliVector`]
#[derive(Debug, Clone, Copy)]
pub struct KernelConfig {
    /// Whether to use parallel execution
    ///
    /// Default: true
    pub use_parallel: bool,

    /// Minimum buffer size for parallel execution
    ///
    /// Smaller states run single-threaded to avoid synchronization
    /// overhead.
    ///
    /// Default: 4096
    pub parallel_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            use_parallel: true,
            parallel_threshold: 1 << 12,
        }
    }
}

/// A density matrix over `n` qubits, stored in the Pauli representation
#[derive(Debug, Clone)]
pub struct PauliVector {
    num_qubits: usize,
    data: Vec<f64>,
    config: KernelConfig,
}

impl PauliVector {
    /// Create the ground state `|0…0⟩⟨0…0|`
    ///
    /// # Errors
    /// Returns an error if the state would not fit in addressable memory.
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_config(num_qubits, KernelConfig::default())
    }

    /// Create the ground state with an explicit parallelism policy
    pub fn with_config(num_qubits: usize, config: KernelConfig) -> Result<Self> {
        let dims = Dims::qubits(num_qubits)?;
        let mut data = vec![0.0; dims.pauli_len()];
        // the all-projector digit 0…0 is |0…0⟩⟨0…0|
        data[0] = 1.0;
        Ok(Self {
            num_qubits,
            data,
            config,
        })
    }

    /// Import a complex-form density matrix
    ///
    /// Runs the per-qubit basis mix followed by the reshuffle. The input is
    /// expected to be Hermitian; the imaginary residue a non-Hermitian
    /// input would leave behind is dropped by the reshuffle.
    pub fn from_complex(dm: &[Complex64]) -> Result<Self> {
        let num_qubits = paulivec_core::qubit_count(dm.len())?;
        let config = KernelConfig::default();
        let mut mixed = dm.to_vec();
        for qubit in 0..num_qubits {
            bit_to_pauli_basis(&mut mixed, qubit, config.use_parallel, config.parallel_threshold)?;
        }
        let mut data = vec![0.0; dm.len()];
        pauli_reshuffle(
            &mut mixed,
            &mut data,
            ReshuffleDirection::ComplexToPauli,
            config.use_parallel,
            config.parallel_threshold,
        )?;
        Ok(Self {
            num_qubits,
            data,
            config,
        })
    }

    /// Export the complex-form density matrix
    pub fn to_complex(&self) -> Result<Vec<Complex64>> {
        let mut complex = vec![Complex64::new(0.0, 0.0); self.data.len()];
        let mut pauli = self.data.clone();
        pauli_reshuffle(
            &mut complex,
            &mut pauli,
            ReshuffleDirection::PauliToComplex,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )?;
        // the mix is an involution, so applying it again per qubit undoes it
        for qubit in 0..self.num_qubits {
            bit_to_pauli_basis(
                &mut complex,
                qubit,
                self.config.use_parallel,
                self.config.parallel_threshold,
            )?;
        }
        Ok(complex)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pauli-form coefficients
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Apply a single-qubit PTM
    pub fn apply_single(&mut self, ptm: &Ptm4, qubit: usize) -> Result<()> {
        apply_ptm_single(
            ptm,
            qubit,
            &mut self.data,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )
    }

    /// Apply a two-qubit PTM, packed `a·4 + b`
    pub fn apply_two(&mut self, ptm: &Ptm16, qubit_a: usize, qubit_b: usize) -> Result<()> {
        apply_ptm_two(
            ptm,
            qubit_a,
            qubit_b,
            &mut self.data,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )
    }

    /// Apply a diagonal PTM in place
    pub fn apply_diagonal(&mut self, ptm: &DiagonalPtm, targets: &[usize]) -> Result<()> {
        apply_ptm_diagonal(
            ptm,
            targets,
            &mut self.data,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )
    }

    /// Apply a PTM, dispatching on its declared dimensions
    ///
    /// Square qubit-shaped matrices go through the tiled fast paths; other
    /// square shapes fall back to the general contraction through a scratch
    /// buffer. The wrapper keeps the full qubit basis, so dimension-changing
    /// operations must work on raw buffers through [`apply_ptm_general`].
    pub fn apply(&mut self, ptm: &Ptm, targets: &[usize]) -> Result<()> {
        if let Some(fast) = ptm.as_single() {
            if targets.len() == 1 {
                return self.apply_single(&fast, targets[0]);
            }
        }
        if let Some(fast) = ptm.as_two() {
            if targets.len() == 2 {
                return self.apply_two(&fast, targets[0], targets[1]);
            }
        }
        for target in 0..ptm.num_targets() {
            if ptm.dim_in(target) != 4 || ptm.dim_out(target) != 4 {
                return Err(KernelError::PtmShapeMismatch {
                    rows: ptm.rows(),
                    cols: ptm.cols(),
                    expected_rows: 4,
                    expected_cols: 4,
                });
            }
        }
        let dims = vec![4usize; self.num_qubits];
        let mut output = vec![0.0; self.data.len()];
        apply_ptm_general(
            ptm,
            targets,
            &self.data,
            &mut output,
            &dims,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )?;
        self.data = output;
        Ok(())
    }

    /// Unnormalized outcome distribution
    pub fn diagonal(&self) -> Result<Vec<f64>> {
        let mut diag = vec![0.0; 1 << self.num_qubits];
        get_diag(
            &self.data,
            &mut diag,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )?;
        Ok(diag)
    }

    /// Trace of the density matrix
    pub fn trace(&self) -> Result<f64> {
        let diag = self.diagonal()?;
        Ok(trace(
            &diag,
            self.config.use_parallel,
            self.config.parallel_threshold,
        ))
    }

    /// Partial trace over one qubit: probabilities of it being 0 or 1
    pub fn partial_trace(&self, qubit: usize) -> Result<(f64, f64)> {
        let diag = self.diagonal()?;
        partial_trace(
            &diag,
            qubit,
            self.config.use_parallel,
            self.config.parallel_threshold,
        )
    }

    /// Relabel two qubits (not a physical SWAP gate)
    pub fn swap(&mut self, sub_a: usize, sub_b: usize) -> Result<()> {
        swap_subsystems(&mut self.data, sub_a, sub_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ptm::common;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ground_state_has_unit_trace() {
        let state = PauliVector::new(3).unwrap();
        assert_abs_diff_eq!(state.trace().unwrap(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(state.data()[0], 1.0, epsilon = 1e-15);
    }

    #[test]
    fn complex_roundtrip_on_ground_state() {
        let state = PauliVector::new(2).unwrap();
        let complex = state.to_complex().unwrap();
        assert_abs_diff_eq!(complex[0].re, 1.0, epsilon = 1e-15);
        let back = PauliVector::from_complex(&complex).unwrap();
        for (a, b) in state.data().iter().zip(back.data()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn dispatched_apply_matches_fast_path() {
        let mut fast = PauliVector::new(2).unwrap();
        let mut dispatched = fast.clone();
        let ptm = common::rotate_x(1.2);
        fast.apply_single(&ptm, 1).unwrap();
        dispatched.apply(&Ptm::from_single(&ptm), &[1]).unwrap();
        for (a, b) in fast.data().iter().zip(dispatched.data()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_dimension_changing_ptm() {
        let mut state = PauliVector::new(2).unwrap();
        let project = Ptm::single(vec![0.0; 8], 2, 4).unwrap();
        assert!(state.apply(&project, &[0]).is_err());
    }
}
