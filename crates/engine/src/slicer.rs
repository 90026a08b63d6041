//! Partitioning of input vectors into zero-padded slices

use cmvm_fixed_point::WordVector;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Splits an input of length `m * K` into K slices of width C.
///
/// Slice `i` holds `input[i*m .. i*m + m)` in its low positions and zeros above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slicer {
    slice_width: usize,
    slice_count: usize,
    populated_width: usize,
}

impl Slicer {
    pub fn new(slice_width: usize, slice_count: usize, populated_width: usize) -> Result<Self> {
        if populated_width > slice_width {
            return Err(EngineError::Config(format!(
                "populated_width ({}) exceeds slice_width ({})",
                populated_width, slice_width
            )));
        }
        Ok(Self {
            slice_width,
            slice_count,
            populated_width,
        })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.slice_width, config.slice_count, config.populated_width)
    }

    /// Required input length
    pub fn input_len(&self) -> usize {
        self.populated_width * self.slice_count
    }

    pub fn slice(&self, input: &WordVector) -> Result<Vec<WordVector>> {
        if input.len() != self.input_len() {
            return Err(EngineError::SliceWidthMismatch {
                expected: self.input_len(),
                got: input.len(),
            });
        }

        let m = self.populated_width;
        let slices = (0..self.slice_count)
            .map(|i| {
                let mut data = vec![0i64; self.slice_width];
                data[..m].copy_from_slice(&input.data[i * m..i * m + m]);
                WordVector {
                    data,
                    width: input.width,
                }
            })
            .collect();
        Ok(slices)
    }
}

/// Slice `input` into `slice_count` slices of `slice_width`, populating
/// `len / slice_count` positions of each.
pub fn slice(input: &WordVector, slice_width: usize, slice_count: usize) -> Result<Vec<WordVector>> {
    if slice_count == 0 || input.len() % slice_count != 0 || input.len() / slice_count > slice_width {
        return Err(EngineError::SliceWidthMismatch {
            expected: nearest_sliceable_len(input.len(), slice_width, slice_count),
            got: input.len(),
        });
    }
    Slicer::new(slice_width, slice_count, input.len() / slice_count)?.slice(input)
}

/// Closest length at or above `len` that `slice` would accept, capped at
/// full slices
fn nearest_sliceable_len(len: usize, slice_width: usize, slice_count: usize) -> usize {
    if slice_count == 0 {
        return 0;
    }
    let rounded = len.div_ceil(slice_count) * slice_count;
    rounded.min(slice_width * slice_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmvm_fixed_point::BitWidth;

    fn vector(data: &[i64]) -> WordVector {
        WordVector::from_raw(data.to_vec(), BitWidth::default())
    }

    #[test]
    fn test_reference_pattern() {
        let slices = slice(&vector(&[5, 6, 7, 8]), 4, 2).unwrap();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].data, vec![5, 6, 0, 0]);
        assert_eq!(slices[1].data, vec![7, 8, 0, 0]);
    }

    #[test]
    fn test_full_slices() {
        let slicer = Slicer::new(2, 3, 2).unwrap();
        let slices = slicer.slice(&vector(&[1, 2, 3, 4, 5, 6])).unwrap();
        assert_eq!(slices[2].data, vec![5, 6]);
    }

    #[test]
    fn test_length_mismatch() {
        let slicer = Slicer::new(4, 2, 2).unwrap();
        assert!(matches!(
            slicer.slice(&vector(&[1, 2, 3])),
            Err(EngineError::SliceWidthMismatch { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_free_slice_rejects_overfull() {
        // 10 elements over 2 slices needs 5 positions per slice
        assert!(matches!(
            slice(&vector(&[0; 10]), 4, 2),
            Err(EngineError::SliceWidthMismatch { .. })
        ));
        assert!(slice(&vector(&[0; 3]), 4, 2).is_err());
        assert!(slice(&vector(&[]), 4, 0).is_err());
    }

    #[test]
    fn test_free_slice_reports_acceptable_length() {
        assert!(matches!(
            slice(&vector(&[0; 3]), 4, 2),
            Err(EngineError::SliceWidthMismatch { expected: 4, got: 3 })
        ));
        assert!(matches!(
            slice(&vector(&[0; 10]), 4, 2),
            Err(EngineError::SliceWidthMismatch { expected: 8, got: 10 })
        ));
        assert!(matches!(
            slice(&vector(&[0; 5]), 4, 3),
            Err(EngineError::SliceWidthMismatch { expected: 6, got: 5 })
        ));
        assert!(matches!(
            slice(&vector(&[0; 2]), 4, 0),
            Err(EngineError::SliceWidthMismatch { expected: 0, got: 2 })
        ));
    }

    #[test]
    fn test_populated_wider_than_slice() {
        assert!(Slicer::new(2, 2, 3).is_err());
    }
}
