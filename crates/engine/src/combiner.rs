//! Elementwise summation of per-slice partial results

use cmvm_fixed_point::{BitWidth, WordVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combiner {
    rows: usize,
    width: BitWidth,
}

impl Combiner {
    pub fn new(rows: usize, width: BitWidth) -> Self {
        Self { rows, width }
    }

    /// Wrapping elementwise sum; missing elements count as zero
    pub fn combine(&self, parts: &[WordVector]) -> WordVector {
        let width = self.width;
        let data = (0..self.rows)
            .map(|i| {
                parts
                    .iter()
                    .fold(0i64, |acc, part| width.add(acc, part.get(i).unwrap_or(0)))
            })
            .collect();
        WordVector { data, width }
    }
}

/// Sum `parts` elementwise into a vector of `rows` words
pub fn combine(parts: &[WordVector], rows: usize, width: BitWidth) -> WordVector {
    Combiner::new(rows, width).combine(parts)
}
