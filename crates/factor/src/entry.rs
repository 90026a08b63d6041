//! Single shift-add terms

use cmvm_fixed_point::BitWidth;
use serde::{Deserialize, Serialize};

/// Sign of a power-of-two term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    #[serde(alias = "+")]
    Positive,
    #[serde(alias = "-")]
    Negative,
}

impl Sign {
    /// +1 or -1
    pub fn signum(self) -> i64 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }
}

/// One term `sign * (x << shift)` of a coefficient decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactorEntry {
    pub shift: u32,
    pub sign: Sign,
}

impl FactorEntry {
    pub fn positive(shift: u32) -> Self {
        Self {
            shift,
            sign: Sign::Positive,
        }
    }

    pub fn negative(shift: u32) -> Self {
        Self {
            shift,
            sign: Sign::Negative,
        }
    }

    /// Accumulate this term applied to `x` into `acc`.
    ///
    /// Shifts of `width` or more shift the operand out entirely and add zero.
    #[inline]
    pub fn accumulate(self, acc: i64, x: i64, width: BitWidth) -> i64 {
        let term = width.shl(x, self.shift);
        match self.sign {
            Sign::Positive => width.add(acc, term),
            Sign::Negative => width.sub(acc, term),
        }
    }
}

impl std::fmt::Display for FactorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.sign {
            Sign::Positive => '+',
            Sign::Negative => '-',
        };
        write!(f, "{}2^{}", sign, self.shift)
    }
}
