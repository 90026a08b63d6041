//! Factor table error types

use thiserror::Error;

use crate::table::TableShape;

#[derive(Error, Debug)]
pub enum FactorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed factor data: {0}")]
    MalformedData(String),

    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: TableShape, got: TableShape },

    #[error("Shift out of range at (plane {plane}, row {row}, col {col}): {shift} >= width {width}")]
    ShiftOutOfRange {
        plane: usize,
        row: usize,
        col: usize,
        shift: u32,
        width: u32,
    },

    #[error("Coefficient {value} at ({row}, {col}) does not fit in {width} bits")]
    CoefficientOutOfRange {
        row: usize,
        col: usize,
        value: i64,
        width: u32,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] cmvm_fixed_point::FixedPointError),
}

impl From<serde_json::Error> for FactorError {
    fn from(e: serde_json::Error) -> Self {
        FactorError::MalformedData(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FactorError>;
