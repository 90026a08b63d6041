//! Providers of validated factor tables

use std::path::{Path, PathBuf};

use cmvm_fixed_point::BitWidth;

use crate::csd::{decompose, decompose_into};
use crate::document::TableDocument;
use crate::error::Result;
use crate::matrix::CoefficientMatrix;
use crate::table::{FactorTable, TableShape};

/// Anything that can yield a validated factor table.
///
/// Failures are `MalformedData`, `ShapeMismatch` or `ShiftOutOfRange`; a
/// successfully loaded table needs no further checking.
pub trait FactorTableSource: Send + Sync {
    fn load(&self) -> Result<FactorTable>;
}

/// An already-built table is its own source
impl FactorTableSource for FactorTable {
    fn load(&self) -> Result<FactorTable> {
        Ok(self.clone())
    }
}

/// Table document stored in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
    pub shape: TableShape,
    pub width: BitWidth,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P, shape: TableShape, width: BitWidth) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            shape,
            width,
        }
    }
}

impl FactorTableSource for JsonFileSource {
    fn load(&self) -> Result<FactorTable> {
        let text = std::fs::read_to_string(&self.path)?;
        let table = TableDocument::parse(&text)?.into_table(self.shape, self.width)?;
        tracing::info!(
            path = %self.path.display(),
            shape = %self.shape,
            terms = table.term_count(),
            "Loaded factor table"
        );
        Ok(table)
    }
}

/// Table document held in memory (embedded or generated JSON)
#[derive(Debug, Clone)]
pub struct JsonStrSource {
    pub text: String,
    pub shape: TableShape,
    pub width: BitWidth,
}

impl JsonStrSource {
    pub fn new(text: impl Into<String>, shape: TableShape, width: BitWidth) -> Self {
        Self {
            text: text.into(),
            shape,
            width,
        }
    }
}

impl FactorTableSource for JsonStrSource {
    fn load(&self) -> Result<FactorTable> {
        TableDocument::parse(&self.text)?.into_table(self.shape, self.width)
    }
}

/// Table generated by CSD-decomposing a constant matrix
#[derive(Debug, Clone)]
pub struct CoefficientSource {
    pub matrix: CoefficientMatrix,
    pub width: BitWidth,
    /// Fixed plane count; the minimum that fits when `None`
    pub planes: Option<usize>,
}

impl CoefficientSource {
    pub fn new(matrix: CoefficientMatrix, width: BitWidth) -> Self {
        Self {
            matrix,
            width,
            planes: None,
        }
    }

    pub fn with_planes(mut self, planes: usize) -> Self {
        self.planes = Some(planes);
        self
    }
}

impl FactorTableSource for CoefficientSource {
    fn load(&self) -> Result<FactorTable> {
        match self.planes {
            Some(planes) => decompose_into(&self.matrix, self.width, planes),
            None => decompose(&self.matrix, self.width),
        }
    }
}
