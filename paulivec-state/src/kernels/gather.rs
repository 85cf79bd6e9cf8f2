//! Generic gather over per-axis index selections
//!
//! The fallback for reshapes, permutations, projections and bystander
//! broadcasts that the specialized kernels do not cover. An [`IndexMap`]
//! declares, for every output axis, which input indices are selected; the
//! kernel walks every output address, maps its digits through the
//! selections, and copies from the recomposed input address. Input and
//! output are distinct borrows, so they cannot alias.

use crate::error::{KernelError, Result};
use paulivec_core::address;
use rayon::prelude::*;
use smallvec::SmallVec;

/// Ragged per-axis index selections plus the input and output shapes
///
/// `offsets` has one entry per axis plus a terminator; axis `t` of the
/// output selects the input indices
/// `selections[offsets[t] .. offsets[t+1]]`, so the output extent along
/// that axis is `offsets[t+1] - offsets[t]`. Validation happens here, at
/// construction; the kernel itself trusts the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    offsets: Vec<usize>,
    selections: Vec<usize>,
    inshape: Vec<usize>,
    outshape: Vec<usize>,
}

impl IndexMap {
    /// Build and validate an index map
    ///
    /// # Errors
    /// Returns an error if `offsets` is not a monotone list of
    /// `inshape.len() + 1` positions into `selections`, or any selection is
    /// out of range for its input axis.
    pub fn new(offsets: Vec<usize>, selections: Vec<usize>, inshape: Vec<usize>) -> Result<Self> {
        if offsets.len() != inshape.len() + 1 {
            return Err(KernelError::InvalidIndexMap {
                reason: format!(
                    "offsets has {} entries, expected {} for {} axes",
                    offsets.len(),
                    inshape.len() + 1,
                    inshape.len()
                ),
            });
        }
        if offsets.first() != Some(&0) || offsets.last() != Some(&selections.len()) {
            return Err(KernelError::InvalidIndexMap {
                reason: "offsets must start at 0 and end at selections.len()".into(),
            });
        }
        let mut outshape = Vec::with_capacity(inshape.len());
        for (axis, window) in offsets.windows(2).enumerate() {
            if window[1] < window[0] {
                return Err(KernelError::InvalidIndexMap {
                    reason: format!("offsets decrease at axis {axis}"),
                });
            }
            for &selected in &selections[window[0]..window[1]] {
                if selected >= inshape[axis] {
                    return Err(KernelError::InvalidIndexMap {
                        reason: format!(
                            "selection {selected} out of range for axis {axis} of extent {}",
                            inshape[axis]
                        ),
                    });
                }
            }
            outshape.push(window[1] - window[0]);
        }
        Ok(Self {
            offsets,
            selections,
            inshape,
            outshape,
        })
    }

    /// The identity map on a shape
    pub fn identity(shape: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(shape.len() + 1);
        let mut selections = Vec::new();
        offsets.push(0);
        for &extent in shape {
            selections.extend(0..extent);
            offsets.push(selections.len());
        }
        Self {
            offsets,
            selections,
            inshape: shape.to_vec(),
            outshape: shape.to_vec(),
        }
    }

    pub fn inshape(&self) -> &[usize] {
        &self.inshape
    }

    pub fn outshape(&self) -> &[usize] {
        &self.outshape
    }

    pub fn in_len(&self) -> usize {
        self.inshape.iter().product()
    }

    pub fn out_len(&self) -> usize {
        self.outshape.iter().product()
    }

    /// Selected input index for one output digit
    #[inline]
    fn select(&self, axis: usize, digit: usize) -> usize {
        self.selections[self.offsets[axis] + digit]
    }
}

/// Gather `input` into `output` through an index map
///
/// For every output linear address: deinterleave by the output shape, map
/// each axis digit through the selections, reinterleave by the input shape,
/// copy.
///
/// # Errors
/// Returns an error if either buffer length disagrees with the map.
pub fn multitake(
    input: &[f64],
    output: &mut [f64],
    map: &IndexMap,
    use_parallel: bool,
    parallel_threshold: usize,
) -> Result<()> {
    if input.len() != map.in_len() {
        return Err(KernelError::LengthMismatch {
            expected: map.in_len(),
            actual: input.len(),
        });
    }
    if output.len() != map.out_len() {
        return Err(KernelError::LengthMismatch {
            expected: map.out_len(),
            actual: output.len(),
        });
    }

    let in_strides = address::pauli_strides(map.inshape());
    let gather = |out_addr: usize| -> f64 {
        let digits = address::pauli_digits(out_addr, map.outshape());
        let mut in_addr = 0;
        for (axis, &digit) in digits.iter().enumerate() {
            in_addr += map.select(axis, digit) * in_strides[axis];
        }
        input[in_addr]
    };

    if use_parallel && output.len() >= parallel_threshold {
        output
            .par_iter_mut()
            .enumerate()
            .for_each(|(addr, out)| *out = gather(addr));
    } else {
        for (addr, out) in output.iter_mut().enumerate() {
            *out = gather(addr);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_is_a_copy() {
        let input: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let mut output = vec![0.0; 24];
        let map = IndexMap::identity(&[2, 3, 4]);
        multitake(&input, &mut output, &map, false, usize::MAX).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn selects_a_sub_block() {
        // 4x4 input, keep rows {1, 3} and all columns
        let input: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let map = IndexMap::new(vec![0, 2, 6], vec![1, 3, 0, 1, 2, 3], vec![4, 4]).unwrap();
        assert_eq!(map.outshape(), &[2, 4]);
        let mut output = vec![0.0; 8];
        multitake(&input, &mut output, &map, false, usize::MAX).unwrap();
        assert_eq!(output, vec![4.0, 5.0, 6.0, 7.0, 12.0, 13.0, 14.0, 15.0]);
    }

    #[test]
    fn reverses_an_axis() {
        let input: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let map = IndexMap::new(vec![0, 2, 6], vec![1, 0, 3, 2, 1, 0], vec![2, 4]).unwrap();
        let mut output = vec![0.0; 8];
        multitake(&input, &mut output, &map, true, 0).unwrap();
        assert_eq!(output, vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn broadcast_duplicates_an_index() {
        // duplicate the single row of a 1x2 input into a 3x2 output
        let input = vec![10.0, 20.0];
        let map = IndexMap::new(vec![0, 3, 5], vec![0, 0, 0, 0, 1], vec![1, 2]).unwrap();
        let mut output = vec![0.0; 6];
        multitake(&input, &mut output, &map, false, usize::MAX).unwrap();
        assert_eq!(output, vec![10.0, 20.0, 10.0, 20.0, 10.0, 20.0]);
    }

    #[test]
    fn rejects_out_of_range_selection() {
        assert!(matches!(
            IndexMap::new(vec![0, 1], vec![5], vec![4]),
            Err(KernelError::InvalidIndexMap { .. })
        ));
        assert!(IndexMap::new(vec![0, 1, 1], vec![0], vec![2]).is_err());
    }

    #[test]
    fn rejects_mismatched_buffers() {
        let map = IndexMap::identity(&[4]);
        let input = vec![0.0; 4];
        let mut short = vec![0.0; 3];
        assert!(matches!(
            multitake(&input, &mut short, &map, false, usize::MAX),
            Err(KernelError::LengthMismatch { expected: 4, actual: 3 })
        ));
    }
}
