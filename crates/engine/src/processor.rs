//! Shift-add evaluation of one factor table against one slice

use cmvm_factor::FactorTable;
use cmvm_fixed_point::{BitWidth, WordVector};

/// Applies factor tables to slices with W-bit wraparound arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceProcessor {
    width: BitWidth,
}

impl SliceProcessor {
    pub fn new(width: BitWidth) -> Self {
        Self { width }
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Evaluate `table` on `slice`, giving one word per table row.
    ///
    /// Each row accumulates from zero over planes in ascending order and,
    /// within a plane, columns in ascending order. Empty cells, slice
    /// positions past the end of `slice`, and shifts of W or more all
    /// contribute zero. Never fails.
    pub fn process(&self, slice: &WordVector, table: &FactorTable) -> WordVector {
        let width = self.width;
        let shape = table.shape();

        let data = (0..shape.rows)
            .map(|row| {
                let mut acc = 0i64;
                for plane in 0..shape.planes {
                    for col in 0..shape.cols {
                        if let Some(entry) = table.get(plane, row, col) {
                            let x = slice.get(col).unwrap_or(0);
                            acc = entry.accumulate(acc, x, width);
                        }
                    }
                }
                acc
            })
            .collect();

        WordVector { data, width }
    }

    /// Evaluate `base` on `slice`, then feed the result through each
    /// correction table in turn
    pub fn process_stages<'a, I>(&self, slice: &WordVector, base: &FactorTable, corrections: I) -> WordVector
    where
        I: IntoIterator<Item = &'a FactorTable>,
    {
        corrections
            .into_iter()
            .fold(self.process(slice, base), |current, table| self.process(&current, table))
    }
}

/// Evaluate `table` on `slice` at the table's own width
pub fn process(slice: &WordVector, table: &FactorTable) -> WordVector {
    SliceProcessor::new(table.width()).process(slice, table)
}
