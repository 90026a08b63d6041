//! CMVM Fixed-Width Arithmetic
//!
//! W-bit two's-complement words stored in `i64`, with the wraparound
//! semantics of a hardware register: every add, subtract and shift is
//! truncated to W bits and overflow is silent.

mod error;
mod fixed;
mod vector;
mod width;

pub use error::{FixedPointError, Result};
pub use fixed::{Fixed, DEFAULT_FRAC_BITS};
pub use vector::WordVector;
pub use width::{BitWidth, DEFAULT_WIDTH, MAX_WIDTH};
