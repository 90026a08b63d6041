//! Register width and wrapping word operations

use serde::{Deserialize, Serialize};

use crate::error::{FixedPointError, Result};

/// Default word width in bits
pub const DEFAULT_WIDTH: u32 = 32;

/// Widest supported word (the `i64` storage type)
pub const MAX_WIDTH: u32 = 64;

/// Bit width W of a two's-complement word.
///
/// Values handled through a `BitWidth` are kept sign-extended in an `i64`,
/// so a wrapped value always lies in `[min_value, max_value]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BitWidth(u32);

impl BitWidth {
    /// Create a width, rejecting 0 and anything wider than 64 bits
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_WIDTH {
            return Err(FixedPointError::InvalidWidth(bits));
        }
        Ok(Self(bits))
    }

    /// Number of bits
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Truncate to the low W bits and sign-extend
    #[inline]
    pub fn wrap(self, value: i64) -> i64 {
        if self.0 == MAX_WIDTH {
            return value;
        }
        let pad = MAX_WIDTH - self.0;
        (value << pad) >> pad
    }

    /// Wrapping addition
    #[inline]
    pub fn add(self, a: i64, b: i64) -> i64 {
        self.wrap(a.wrapping_add(b))
    }

    /// Wrapping subtraction
    #[inline]
    pub fn sub(self, a: i64, b: i64) -> i64 {
        self.wrap(a.wrapping_sub(b))
    }

    /// Wrapping negation
    #[inline]
    pub fn neg(self, a: i64) -> i64 {
        self.wrap(a.wrapping_neg())
    }

    /// Left shift with hardware shift-out: any shift of W or more yields zero
    #[inline]
    pub fn shl(self, value: i64, shift: u32) -> i64 {
        if shift >= self.0 {
            return 0;
        }
        self.wrap(value.wrapping_shl(shift))
    }

    /// Smallest representable value, -2^(W-1)
    pub fn min_value(self) -> i64 {
        i64::MIN >> (MAX_WIDTH - self.0)
    }

    /// Largest representable value, 2^(W-1) - 1
    pub fn max_value(self) -> i64 {
        i64::MAX >> (MAX_WIDTH - self.0)
    }

    /// Whether `value` is representable without wrapping
    pub fn contains(self, value: i64) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }
}

impl Default for BitWidth {
    fn default() -> Self {
        Self(DEFAULT_WIDTH)
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = FixedPointError;

    fn try_from(bits: u32) -> Result<Self> {
        Self::new(bits)
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> Self {
        width.0
    }
}

impl std::fmt::Display for BitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
