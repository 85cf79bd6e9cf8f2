//! Per-subsystem Pauli basis description
//!
//! The Pauli-form state expands the density matrix over a Hermitian,
//! trace-orthonormal basis per subsystem. For Hilbert dimension `d` the
//! basis has `d²` elements, indexed by the digit `r·d + c`:
//!
//! - `r == c`: the projector `|r⟩⟨r|`;
//! - `r < c`: the symmetric combination `(|r⟩⟨c| + |c⟩⟨r|) / √2` (X-like);
//! - `r > c`: the antisymmetric combination `(i|r⟩⟨c| − i|c⟩⟨r|) / √2`
//!   (Y-like).
//!
//! For a qubit this is `{|0⟩⟨0|, X/√2, Y/√2, |1⟩⟨1|}` with digits 0..3, and
//! the digit coincides with the (row bit, column bit) pair of the complex
//! layout. All elements satisfy `Tr(B_i B_j†) = δ_ij`.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Role of one basis element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Diagonal projector `|r⟩⟨r|`
    Projector,
    /// Symmetric off-diagonal combination (X-like)
    Symmetric,
    /// Antisymmetric off-diagonal combination (Y-like)
    Antisymmetric,
}

/// The full Pauli basis of one subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauliBasis {
    dim_hilbert: usize,
}

impl PauliBasis {
    pub fn new(dim_hilbert: usize) -> Self {
        Self { dim_hilbert }
    }

    pub fn dim_hilbert(&self) -> usize {
        self.dim_hilbert
    }

    /// Number of basis elements (`d²`)
    pub fn dim_pauli(&self) -> usize {
        self.dim_hilbert * self.dim_hilbert
    }

    /// The (row, col) pair encoded by a digit
    #[inline]
    pub fn row_col(&self, digit: usize) -> (usize, usize) {
        (digit / self.dim_hilbert, digit % self.dim_hilbert)
    }

    pub fn kind(&self, digit: usize) -> ElementKind {
        let (r, c) = self.row_col(digit);
        match r.cmp(&c) {
            std::cmp::Ordering::Equal => ElementKind::Projector,
            std::cmp::Ordering::Less => ElementKind::Symmetric,
            std::cmp::Ordering::Greater => ElementKind::Antisymmetric,
        }
    }

    /// Digit of the projector onto a computational outcome
    ///
    /// The diagonal of the density matrix lives on exactly these digits.
    #[inline]
    pub fn diagonal_digit(&self, outcome: usize) -> usize {
        outcome * self.dim_hilbert + outcome
    }

    /// Contribution of a basis element's coefficient to the trace
    ///
    /// Projector elements have unit trace, both off-diagonal kinds are
    /// traceless.
    pub fn trace_weight(&self, digit: usize) -> f64 {
        match self.kind(digit) {
            ElementKind::Projector => 1.0,
            _ => 0.0,
        }
    }

    /// Dense `d × d` matrix of a basis element, row-major
    pub fn element_matrix(&self, digit: usize) -> Vec<Complex64> {
        let d = self.dim_hilbert;
        let (r, c) = self.row_col(digit);
        let mut mat = vec![Complex64::new(0.0, 0.0); d * d];
        match self.kind(digit) {
            ElementKind::Projector => {
                mat[r * d + r] = Complex64::new(1.0, 0.0);
            }
            ElementKind::Symmetric => {
                mat[r * d + c] = Complex64::new(FRAC_1_SQRT_2, 0.0);
                mat[c * d + r] = Complex64::new(FRAC_1_SQRT_2, 0.0);
            }
            ElementKind::Antisymmetric => {
                mat[r * d + c] = Complex64::new(0.0, FRAC_1_SQRT_2);
                mat[c * d + r] = Complex64::new(0.0, -FRAC_1_SQRT_2);
            }
        }
        mat
    }

    pub fn label(&self, digit: usize) -> String {
        let (r, c) = self.row_col(digit);
        match self.kind(digit) {
            ElementKind::Projector => format!("{r}"),
            ElementKind::Symmetric => format!("X{r}{c}"),
            ElementKind::Antisymmetric => format!("Y{c}{r}"),
        }
    }
}
