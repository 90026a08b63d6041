//! Fixed-width arithmetic error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixedPointError {
    #[error("Invalid bit width: {0} (must be 1-64)")]
    InvalidWidth(u32),

    #[error("Overflow during fixed-point conversion: value {value} exceeds {width}-bit range")]
    Overflow { value: f64, width: u32 },

    #[error("Underflow during fixed-point conversion: value {value} below {width}-bit range")]
    Underflow { value: f64, width: u32 },

    #[error("Invalid fractional bits: {frac_bits} for a {width}-bit word")]
    InvalidFracBits { frac_bits: u8, width: u32 },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Width mismatch: expected {expected}, got {got}")]
    WidthMismatch { expected: u32, got: u32 },
}

pub type Result<T> = std::result::Result<T, FixedPointError>;
