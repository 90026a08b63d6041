//! Quantized fixed-point scalar

use crate::error::{FixedPointError, Result};
use crate::width::BitWidth;

/// Default number of fractional bits (matches the 16.8 layout of the coefficient tools)
pub const DEFAULT_FRAC_BITS: u8 = 8;

/// A fixed-point number: `raw / 2^frac_bits`, with `raw` representable in W bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fixed {
    /// The raw integer value
    pub raw: i64,
    /// Number of fractional bits
    pub frac_bits: u8,
}

fn scale_factor(frac_bits: u8) -> f64 {
    2f64.powi(frac_bits as i32)
}

impl Fixed {
    /// Quantize a floating-point value, rounding to nearest
    pub fn from_f64(value: f64, frac_bits: u8, width: BitWidth) -> Result<Self> {
        if frac_bits as u32 >= width.bits() {
            return Err(FixedPointError::InvalidFracBits {
                frac_bits,
                width: width.bits(),
            });
        }

        let scaled = (value * scale_factor(frac_bits)).round();
        // 2^(W-1) is exact in f64 for every W, unlike max_value() near 64 bits
        let bound = 2f64.powi(width.bits() as i32 - 1);

        if scaled.is_nan() || scaled >= bound {
            return Err(FixedPointError::Overflow {
                value,
                width: width.bits(),
            });
        }
        if scaled < -bound {
            return Err(FixedPointError::Underflow {
                value,
                width: width.bits(),
            });
        }

        Ok(Self {
            raw: scaled as i64,
            frac_bits,
        })
    }

    /// Convert back to floating-point
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / scale_factor(self.frac_bits)
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}", self.to_f64())
    }
}
