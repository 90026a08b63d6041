//! Engine error types

use cmvm_factor::TableShape;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Slice width mismatch: expected input length {expected}, got {got}")]
    SliceWidthMismatch { expected: usize, got: usize },

    #[error("Engine config error: {0}")]
    Config(String),

    #[error("Table count mismatch: expected {expected} slices, got {got}")]
    TableCount { expected: usize, got: usize },

    #[error("Table shape mismatch for slice {slice} stage {stage}: expected {expected}, got {got}")]
    TableShape {
        slice: usize,
        stage: usize,
        expected: TableShape,
        got: TableShape,
    },

    #[error("Table width mismatch for slice {slice}: expected {expected} bits, got {got}")]
    TableWidth { slice: usize, expected: u32, got: u32 },

    #[error("Factor table error: {0}")]
    Factor(#[from] cmvm_factor::FactorError),

    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] cmvm_fixed_point::FixedPointError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
