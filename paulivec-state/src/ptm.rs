//! Pauli transfer matrix types
//!
//! A PTM is a dense real matrix acting on the Pauli-basis coefficients of
//! one or two target subsystems. The fast-path kernels take the fixed-size
//! [`Ptm4`] / [`Ptm16`] forms; the general kernel takes a [`Ptm`] with
//! declared per-target input and output dimensions, which may differ for
//! projective or embedding operations. [`DiagonalPtm`] carries only the
//! diagonal and is the one variant whose application is offered in place on
//! a shared buffer.
//!
//! The kernels never validate that a PTM is a legitimate quantum channel;
//! that is a modeling concern upstream.

use crate::error::{KernelError, Result};
use smallvec::SmallVec;

/// 4×4 PTM for a single qubit
pub type Ptm4 = [[f64; 4]; 4];

/// 16×16 PTM for a qubit pair, row/column index packed as `a·4 + b` with
/// `a` the first named target
pub type Ptm16 = [[f64; 16]; 16];

/// General PTM with declared per-target Pauli dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct Ptm {
    /// Row-major, shape `(∏ dims_out) × (∏ dims_in)`
    data: Vec<f64>,
    dims_in: SmallVec<[usize; 2]>,
    dims_out: SmallVec<[usize; 2]>,
}

impl Ptm {
    /// PTM acting on one subsystem
    ///
    /// # Errors
    /// Returns an error if `data.len() != dim_out * dim_in`.
    pub fn single(data: Vec<f64>, dim_out: usize, dim_in: usize) -> Result<Self> {
        Self::checked(data, SmallVec::from_slice(&[dim_in]), SmallVec::from_slice(&[dim_out]))
    }

    /// PTM acting on two subsystems, index packed `a·dim_b + b`
    pub fn two(
        data: Vec<f64>,
        dims_out: (usize, usize),
        dims_in: (usize, usize),
    ) -> Result<Self> {
        Self::checked(
            data,
            SmallVec::from_slice(&[dims_in.0, dims_in.1]),
            SmallVec::from_slice(&[dims_out.0, dims_out.1]),
        )
    }

    fn checked(
        data: Vec<f64>,
        dims_in: SmallVec<[usize; 2]>,
        dims_out: SmallVec<[usize; 2]>,
    ) -> Result<Self> {
        let rows: usize = dims_out.iter().product();
        let cols: usize = dims_in.iter().product();
        if data.len() != rows * cols {
            return Err(KernelError::LengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            dims_in,
            dims_out,
        })
    }

    /// Identity PTM on one subsystem
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self {
            data,
            dims_in: SmallVec::from_slice(&[dim]),
            dims_out: SmallVec::from_slice(&[dim]),
        }
    }

    pub fn from_single(ptm: &Ptm4) -> Self {
        let data = ptm.iter().flatten().copied().collect();
        Self {
            data,
            dims_in: SmallVec::from_slice(&[4]),
            dims_out: SmallVec::from_slice(&[4]),
        }
    }

    pub fn from_two(ptm: &Ptm16) -> Self {
        let data = ptm.iter().flatten().copied().collect();
        Self {
            data,
            dims_in: SmallVec::from_slice(&[4, 4]),
            dims_out: SmallVec::from_slice(&[4, 4]),
        }
    }

    /// Number of target subsystems (1 or 2)
    pub fn num_targets(&self) -> usize {
        self.dims_in.len()
    }

    /// View as a single-qubit fast-path matrix, if the shape allows
    pub fn as_single(&self) -> Option<Ptm4> {
        if self.dims_in.as_slice() != [4] || self.dims_out.as_slice() != [4] {
            return None;
        }
        let mut out = [[0.0; 4]; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            slot.copy_from_slice(&self.data[row * 4..row * 4 + 4]);
        }
        Some(out)
    }

    /// View as a two-qubit fast-path matrix, if the shape allows
    pub fn as_two(&self) -> Option<Ptm16> {
        if self.dims_in.as_slice() != [4, 4] || self.dims_out.as_slice() != [4, 4] {
            return None;
        }
        let mut out = [[0.0; 16]; 16];
        for (row, slot) in out.iter_mut().enumerate() {
            slot.copy_from_slice(&self.data[row * 16..row * 16 + 16]);
        }
        Some(out)
    }

    /// Input Pauli dimension of one target
    pub fn dim_in(&self, target: usize) -> usize {
        self.dims_in[target]
    }

    /// Output Pauli dimension of one target
    pub fn dim_out(&self, target: usize) -> usize {
        self.dims_out[target]
    }

    pub fn rows(&self) -> usize {
        self.dims_out.iter().product()
    }

    pub fn cols(&self) -> usize {
        self.dims_in.iter().product()
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols() + col]
    }

    /// Whether the matrix is square and diagonal
    pub fn is_diagonal(&self) -> bool {
        if self.rows() != self.cols() {
            return false;
        }
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if row != col && self.at(row, col).abs() > 1e-15 {
                    return false;
                }
            }
        }
        true
    }
}

/// Diagonal PTM (pure dephasing / relabeling channels)
///
/// The only transfer-matrix form accepted by the in-place whole-buffer
/// applicator: every output coefficient depends only on the input
/// coefficient at the same address, so a shared buffer cannot see a
/// read-after-write hazard.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalPtm {
    diag: Vec<f64>,
}

impl DiagonalPtm {
    pub fn new(diag: Vec<f64>) -> Self {
        Self { diag }
    }

    pub fn dim(&self) -> usize {
        self.diag.len()
    }

    #[inline]
    pub fn at(&self, index: usize) -> f64 {
        self.diag[index]
    }
}

/// Kronecker product of two single-qubit PTMs, packed `a·4 + b`
pub fn kron(a: &Ptm4, b: &Ptm4) -> Ptm16 {
    let mut out = [[0.0; 16]; 16];
    for (ao, a_row) in a.iter().enumerate() {
        for (bo, b_row) in b.iter().enumerate() {
            for (ai, &a_val) in a_row.iter().enumerate() {
                for (bi, &b_val) in b_row.iter().enumerate() {
                    out[ao * 4 + bo][ai * 4 + bi] = a_val * b_val;
                }
            }
        }
    }
    out
}

/// Stock transfer matrices in the digit convention `{|0⟩⟨0|, X/√2, Y/√2, |1⟩⟨1|}`
pub mod common {
    use super::{DiagonalPtm, Ptm16, Ptm4};
    use std::f64::consts::FRAC_1_SQRT_2;

    pub fn identity4() -> Ptm4 {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        m
    }

    pub fn identity16() -> Ptm16 {
        let mut m = [[0.0; 16]; 16];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        m
    }

    /// Conjugation by X: exchanges the populations, negates the Y component
    pub fn bit_flip() -> Ptm4 {
        [
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
        ]
    }

    /// Conjugation by Z: negates both off-diagonal components
    pub fn phase_flip() -> DiagonalPtm {
        DiagonalPtm::new(vec![1.0, -1.0, -1.0, 1.0])
    }

    /// Rotation about X by `theta`
    pub fn rotate_x(theta: f64) -> Ptm4 {
        let c = theta.cos();
        let s = theta.sin();
        [
            [(1.0 + c) / 2.0, 0.0, s * FRAC_1_SQRT_2, (1.0 - c) / 2.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s * FRAC_1_SQRT_2, 0.0, c, s * FRAC_1_SQRT_2],
            [(1.0 - c) / 2.0, 0.0, -s * FRAC_1_SQRT_2, (1.0 + c) / 2.0],
        ]
    }

    /// Pure dephasing: off-diagonal components decay by `1 - lambda`
    pub fn dephasing(lambda: f64) -> DiagonalPtm {
        DiagonalPtm::new(vec![1.0, 1.0 - lambda, 1.0 - lambda, 1.0])
    }

    /// Amplitude damping towards `|0⟩` with decay probability `gamma`
    pub fn amplitude_damping(gamma: f64) -> Ptm4 {
        let k = (1.0 - gamma).sqrt();
        [
            [1.0, 0.0, 0.0, gamma],
            [0.0, k, 0.0, 0.0],
            [0.0, 0.0, k, 0.0],
            [0.0, 0.0, 0.0, 1.0 - gamma],
        ]
    }
}
