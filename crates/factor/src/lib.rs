//! CMVM Factor Tables
//!
//! A factor table encodes a constant matrix as signed power-of-two terms:
//! for every (digit plane, output row, input column) at most one term
//! `sign * (x << shift)`. Tables are validated once at load time and are
//! read-only afterwards.

mod csd;
mod distortion;
mod document;
mod entry;
mod error;
mod matrix;
mod source;
mod table;

pub use csd::{csd_digits, decompose, decompose_into, required_planes};
pub use distortion::sqnr_db;
pub use document::{TableDocument, TermRecord};
pub use entry::{FactorEntry, Sign};
pub use error::{FactorError, Result};
pub use matrix::CoefficientMatrix;
pub use source::{CoefficientSource, FactorTableSource, JsonFileSource, JsonStrSource};
pub use table::{FactorTable, TableShape, Term};
