//! Fixed-width word vectors

use crate::error::{FixedPointError, Result};
use crate::fixed::Fixed;
use crate::width::BitWidth;

/// A vector of W-bit two's-complement words with a common width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordVector {
    /// Sign-extended element values, each already wrapped to `width`
    pub data: Vec<i64>,
    /// Common bit width for all elements
    pub width: BitWidth,
}

impl WordVector {
    /// Create a vector from raw values, wrapping each one to `width`
    pub fn from_raw(data: Vec<i64>, width: BitWidth) -> Self {
        let data = data.into_iter().map(|x| width.wrap(x)).collect();
        Self { data, width }
    }

    /// Create a zero vector of given length
    pub fn zeros(len: usize, width: BitWidth) -> Self {
        Self {
            data: vec![0; len],
            width,
        }
    }

    /// Quantize floating-point values with `frac_bits` fractional bits
    pub fn from_f64_slice(values: &[f64], frac_bits: u8, width: BitWidth) -> Result<Self> {
        let mut data = Vec::with_capacity(values.len());
        for &v in values {
            data.push(Fixed::from_f64(v, frac_bits, width)?.raw);
        }
        Ok(Self { data, width })
    }

    /// Interpret the words as fixed-point values with `frac_bits` fractional bits
    pub fn to_f64_vec(&self, frac_bits: u8) -> Vec<f64> {
        self.data
            .iter()
            .map(|&raw| Fixed { raw, frac_bits }.to_f64())
            .collect()
    }

    /// Get the length of the vector
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the vector is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<i64> {
        self.data.get(index).copied()
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.width != other.width {
            return Err(FixedPointError::WidthMismatch {
                expected: self.width.bits(),
                got: other.width.bits(),
            });
        }
        if self.len() != other.len() {
            return Err(FixedPointError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(())
    }

    /// Element-wise wrapping addition
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let width = self.width;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| width.add(a, b))
            .collect();
        Ok(Self { data, width })
    }

    /// Element-wise wrapping subtraction
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;
        let width = self.width;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| width.sub(a, b))
            .collect();
        Ok(Self { data, width })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_wraps() {
        let w = BitWidth::new(8).unwrap();
        let v = WordVector::from_raw(vec![127, 128, 255, 256, -129], w);
        assert_eq!(v.data, vec![127, -128, -1, 0, 127]);
    }

    #[test]
    fn test_vector_add() {
        let w = BitWidth::default();
        let a = WordVector::from_raw(vec![1, 2, 3, 4], w);
        let b = WordVector::from_raw(vec![10, 20, 30, 40], w);
        assert_eq!(a.add(&b).unwrap().data, vec![11, 22, 33, 44]);
        assert_eq!(b.sub(&a).unwrap().data, vec![9, 18, 27, 36]);
    }

    #[test]
    fn test_vector_add_wraps() {
        let w = BitWidth::default();
        let a = WordVector::from_raw(vec![i32::MAX as i64], w);
        let b = WordVector::from_raw(vec![1], w);
        assert_eq!(a.add(&b).unwrap().data, vec![i32::MIN as i64]);
    }

    #[test]
    fn test_fixed_point_view() {
        let w = BitWidth::default();
        let v = WordVector::from_f64_slice(&[1.5, -0.25], 8, w).unwrap();
        assert_eq!(v.data, vec![384, -64]);
        assert_eq!(v.to_f64_vec(8), vec![1.5, -0.25]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let w = BitWidth::default();
        let a = WordVector::zeros(2, w);
        let b = WordVector::zeros(3, w);
        assert!(matches!(
            a.add(&b),
            Err(FixedPointError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let a = WordVector::zeros(2, BitWidth::new(16).unwrap());
        let b = WordVector::zeros(2, BitWidth::new(32).unwrap());
        assert!(matches!(
            a.add(&b),
            Err(FixedPointError::WidthMismatch { .. })
        ));
    }
}
