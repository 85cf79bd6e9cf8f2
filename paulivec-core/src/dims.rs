//! Subsystem dimension vectors
//!
//! A density matrix over `n` subsystems of Hilbert dimensions `d_0..d_{n-1}`
//! has `∏ d_i²` coefficients in both the complex and the Pauli layout. The
//! caller owns the buffers; this type only answers sizing and stride
//! questions, and rejects states that cannot be addressed before any kernel
//! gets a chance to run on them.

use crate::error::{CoreError, Result};
use smallvec::SmallVec;

/// Per-subsystem Hilbert dimensions, subsystem 0 most significant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dims {
    hilbert: SmallVec<[usize; 8]>,
}

impl Dims {
    /// Create a dimension vector, checking that the state is addressable
    ///
    /// # Errors
    /// Returns an error if any dimension is below 2 or if `∏ d_i²` does not
    /// fit in a `usize`.
    pub fn new(hilbert: &[usize]) -> Result<Self> {
        let mut total: usize = 1;
        for &d in hilbert {
            if d < 2 {
                return Err(CoreError::InvalidDimension { dim: d });
            }
            total = d
                .checked_mul(d)
                .and_then(|sq| total.checked_mul(sq))
                .ok_or_else(|| CoreError::StateTooLarge {
                    num_subsystems: hilbert.len(),
                    requested: hilbert.iter().map(|&d| (d * d) as u128).product(),
                })?;
        }
        Ok(Self {
            hilbert: SmallVec::from_slice(hilbert),
        })
    }

    /// Dimension vector for `n` qubits
    pub fn qubits(num_qubits: usize) -> Result<Self> {
        if num_qubits * 2 >= usize::BITS as usize {
            return Err(CoreError::StateTooLarge {
                num_subsystems: num_qubits,
                requested: 1u128 << (2 * num_qubits as u32),
            });
        }
        Ok(Self {
            hilbert: SmallVec::from_elem(2, num_qubits),
        })
    }

    /// Number of subsystems
    pub fn len(&self) -> usize {
        self.hilbert.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hilbert.is_empty()
    }

    /// Hilbert dimension of one subsystem
    pub fn hilbert(&self, subsystem: usize) -> usize {
        self.hilbert[subsystem]
    }

    /// Pauli dimension (`d²`) of one subsystem
    pub fn pauli_dim(&self, subsystem: usize) -> usize {
        self.hilbert[subsystem] * self.hilbert[subsystem]
    }

    /// Per-subsystem Pauli dimensions
    pub fn pauli_dims(&self) -> SmallVec<[usize; 8]> {
        self.hilbert.iter().map(|&d| d * d).collect()
    }

    /// Coefficient count of the Pauli-form buffer
    pub fn pauli_len(&self) -> usize {
        self.hilbert.iter().map(|&d| d * d).product()
    }

    /// Entry count of the complex-form buffer (same count; `Complex64` entries)
    pub fn complex_len(&self) -> usize {
        self.pauli_len()
    }

    /// Stride of a subsystem's Pauli digit in the linear address
    ///
    /// Subsystem 0 is most significant, so its stride is the largest.
    pub fn pauli_stride(&self, subsystem: usize) -> usize {
        self.hilbert[subsystem + 1..].iter().map(|&d| d * d).product()
    }

    /// Check a subsystem index
    pub fn check_subsystem(&self, subsystem: usize) -> Result<()> {
        if subsystem >= self.hilbert.len() {
            return Err(CoreError::InvalidSubsystem {
                index: subsystem,
                num_subsystems: self.hilbert.len(),
            });
        }
        Ok(())
    }
}

/// Recover the qubit count from a buffer of `4^n` coefficients
///
/// # Errors
/// Returns an error if `len` is not an exact power of four.
pub fn qubit_count(len: usize) -> Result<usize> {
    if len.is_power_of_two() && len.trailing_zeros() % 2 == 0 {
        Ok(len.trailing_zeros() as usize / 2)
    } else {
        Err(CoreError::LengthMismatch {
            expected: len.next_power_of_two(),
            actual: len,
        })
    }
}

/// Row-major strides for a list of per-axis dimensions
pub fn strides(dims: &[usize]) -> SmallVec<[usize; 8]> {
    let mut strides: SmallVec<[usize; 8]> = SmallVec::from_elem(1, dims.len());
    for i in (0..dims.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * dims[i + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qubit_dims() {
        let dims = Dims::qubits(3).unwrap();
        assert_eq!(dims.len(), 3);
        assert_eq!(dims.pauli_len(), 64);
        assert_eq!(dims.complex_len(), 64);
        assert_eq!(dims.pauli_stride(0), 16);
        assert_eq!(dims.pauli_stride(2), 1);
    }

    #[test]
    fn qutrit_dims() {
        let dims = Dims::new(&[3, 2]).unwrap();
        assert_eq!(dims.pauli_dim(0), 9);
        assert_eq!(dims.pauli_len(), 36);
        assert_eq!(dims.pauli_stride(0), 4);
    }

    #[test]
    fn rejects_unaddressable_state() {
        assert!(matches!(
            Dims::qubits(40),
            Err(CoreError::StateTooLarge { .. })
        ));
        assert!(matches!(
            Dims::new(&[1, 2]),
            Err(CoreError::InvalidDimension { dim: 1 })
        ));
    }

    #[test]
    fn qubit_count_roundtrip() {
        for n in 0..8 {
            assert_eq!(qubit_count(1 << (2 * n)).unwrap(), n);
        }
        assert!(qubit_count(8).is_err());
        assert!(qubit_count(12).is_err());
    }

    #[test]
    fn row_major_strides() {
        assert_eq!(strides(&[4, 4, 4]).as_slice(), &[16, 4, 1]);
        assert_eq!(strides(&[9, 4]).as_slice(), &[4, 1]);
    }
}
