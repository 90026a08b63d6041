//! Validated three-dimensional factor tables

use cmvm_fixed_point::BitWidth;
use serde::{Deserialize, Serialize};

use crate::entry::FactorEntry;
use crate::error::{FactorError, Result};

/// Dimensions D x R x C of a factor table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableShape {
    /// Number of digit planes (D)
    pub planes: usize,
    /// Number of output rows (R)
    pub rows: usize,
    /// Number of input columns (C)
    pub cols: usize,
}

impl TableShape {
    pub fn new(planes: usize, rows: usize, cols: usize) -> Self {
        Self { planes, rows, cols }
    }

    /// Total number of (plane, row, col) cells
    pub fn cells(&self) -> usize {
        self.planes * self.rows * self.cols
    }

    /// Shape suggested by a flat list of `cells` entries: whole planes of
    /// R x C when they divide evenly, otherwise a single 1 x 1 x cells row
    fn implied_by(&self, cells: usize) -> TableShape {
        let plane_cells = self.rows * self.cols;
        if plane_cells > 0 && cells % plane_cells == 0 {
            TableShape::new(cells / plane_cells, self.rows, self.cols)
        } else {
            TableShape::new(1, 1, cells)
        }
    }

    fn contains(&self, plane: usize, row: usize, col: usize) -> bool {
        plane < self.planes && row < self.rows && col < self.cols
    }
}

impl std::fmt::Display for TableShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.planes, self.rows, self.cols)
    }
}

/// A present entry together with its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub plane: usize,
    pub row: usize,
    pub col: usize,
    pub entry: FactorEntry,
}

/// Immutable (plane, row, col) -> factor entry mapping.
///
/// Cells without an entry contribute nothing. Every stored shift is below
/// the table's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorTable {
    shape: TableShape,
    width: BitWidth,
    /// Plane-major, then row, then column
    entries: Vec<Option<FactorEntry>>,
}

impl FactorTable {
    /// Build from a dense cell list in (plane, row, col) order
    pub fn new(
        shape: TableShape,
        width: BitWidth,
        entries: Vec<Option<FactorEntry>>,
    ) -> Result<Self> {
        if entries.len() != shape.cells() {
            return Err(FactorError::ShapeMismatch {
                expected: shape,
                got: shape.implied_by(entries.len()),
            });
        }

        let table = Self {
            shape,
            width,
            entries,
        };
        if let Some(term) = table.terms().find(|t| t.entry.shift >= width.bits()) {
            return Err(FactorError::ShiftOutOfRange {
                plane: term.plane,
                row: term.row,
                col: term.col,
                shift: term.entry.shift,
                width: width.bits(),
            });
        }
        Ok(table)
    }

    /// A table with no terms; processes every input to zero
    pub fn empty(shape: TableShape, width: BitWidth) -> Self {
        Self {
            shape,
            width,
            entries: vec![None; shape.cells()],
        }
    }

    /// Build from sparse terms. Out-of-bounds or repeated coordinates are malformed.
    pub fn from_terms<I>(shape: TableShape, width: BitWidth, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut entries = vec![None; shape.cells()];
        for term in terms {
            if !shape.contains(term.plane, term.row, term.col) {
                return Err(FactorError::MalformedData(format!(
                    "term at ({}, {}, {}) outside {} table",
                    term.plane, term.row, term.col, shape
                )));
            }
            let idx = (term.plane * shape.rows + term.row) * shape.cols + term.col;
            if entries[idx].is_some() {
                return Err(FactorError::MalformedData(format!(
                    "duplicate term at ({}, {}, {})",
                    term.plane, term.row, term.col
                )));
            }
            entries[idx] = Some(term.entry);
        }
        Self::new(shape, width, entries)
    }

    #[inline]
    fn index(&self, plane: usize, row: usize, col: usize) -> usize {
        (plane * self.shape.rows + row) * self.shape.cols + col
    }

    /// Entry at (plane, row, col); `None` for empty or out-of-bounds cells
    #[inline]
    pub fn get(&self, plane: usize, row: usize, col: usize) -> Option<FactorEntry> {
        if !self.shape.contains(plane, row, col) {
            return None;
        }
        self.entries[self.index(plane, row, col)]
    }

    pub fn shape(&self) -> TableShape {
        self.shape
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Number of present terms, i.e. shift-add operations per evaluation
    pub fn term_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Present terms in (plane, row, col) order
    pub fn terms(&self) -> impl Iterator<Item = Term> + '_ {
        let TableShape { rows, cols, .. } = self.shape;
        self.entries.iter().enumerate().filter_map(move |(idx, e)| {
            e.map(|entry| Term {
                plane: idx / (rows * cols),
                row: (idx / cols) % rows,
                col: idx % cols,
                entry,
            })
        })
    }

    /// The integer matrix (R x C, row-major) this table encodes, modulo 2^W
    pub fn effective_matrix(&self) -> Vec<i64> {
        let width = self.width;
        let mut matrix = vec![0i64; self.shape.rows * self.shape.cols];
        for term in self.terms() {
            let idx = term.row * self.shape.cols + term.col;
            matrix[idx] = term.entry.accumulate(matrix[idx], 1, width);
        }
        matrix
    }
}
