//! Constant integer coefficient matrices

use cmvm_fixed_point::{BitWidth, Fixed, WordVector};

use crate::error::{FactorError, Result};

/// A constant matrix of integer coefficients in row-major order.
///
/// Real-valued matrices are carried as `raw / 2^frac_bits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoefficientMatrix {
    pub data: Vec<i64>,
    pub rows: usize,
    pub cols: usize,
    /// Fractional bits of the quantized coefficients (0 for integer matrices)
    pub frac_bits: u8,
}

impl CoefficientMatrix {
    /// Create from row-major integer data
    pub fn from_raw(data: Vec<i64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(FactorError::DimensionMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            rows,
            cols,
            frac_bits: 0,
        })
    }

    /// Quantize row-major f64 data with `frac_bits` fractional bits
    pub fn from_f64(
        data: &[f64],
        rows: usize,
        cols: usize,
        frac_bits: u8,
        width: BitWidth,
    ) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(FactorError::DimensionMismatch {
                expected: rows * cols,
                got: data.len(),
            });
        }

        let data = data
            .iter()
            .map(|&v| Fixed::from_f64(v, frac_bits, width).map(|f| f.raw))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            data,
            rows,
            cols,
            frac_bits,
        })
    }

    /// Quantize a list of equally long rows
    pub fn from_f64_rows(rows: &[Vec<f64>], frac_bits: u8, width: BitWidth) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut flat = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(FactorError::DimensionMismatch {
                    expected: cols,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        Self::from_f64(&flat, rows.len(), cols, frac_bits, width)
    }

    /// Coefficient at (row, col)
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[row * self.cols + col]
    }

    /// Dequantized coefficients, row-major
    pub fn to_f64(&self) -> Vec<f64> {
        let frac_bits = self.frac_bits;
        self.data
            .iter()
            .map(|&raw| Fixed { raw, frac_bits }.to_f64())
            .collect()
    }

    /// Split into consecutive column blocks of the given widths
    pub fn slice_columns(&self, widths: &[usize]) -> Result<Vec<CoefficientMatrix>> {
        let total: usize = widths.iter().sum();
        if total != self.cols {
            return Err(FactorError::DimensionMismatch {
                expected: self.cols,
                got: total,
            });
        }

        let mut start = 0;
        let mut slices = Vec::with_capacity(widths.len());
        for &w in widths {
            let mut data = Vec::with_capacity(self.rows * w);
            for r in 0..self.rows {
                let base = r * self.cols + start;
                data.extend_from_slice(&self.data[base..base + w]);
            }
            slices.push(CoefficientMatrix {
                data,
                rows: self.rows,
                cols: w,
                frac_bits: self.frac_bits,
            });
            start += w;
        }
        Ok(slices)
    }

    /// Widen to `cols` columns by appending zero columns
    pub fn pad_columns(&self, cols: usize) -> Result<CoefficientMatrix> {
        if cols < self.cols {
            return Err(FactorError::DimensionMismatch {
                expected: self.cols,
                got: cols,
            });
        }

        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(&self.data[r * self.cols..(r + 1) * self.cols]);
            data.extend(std::iter::repeat(0).take(cols - self.cols));
        }
        Ok(CoefficientMatrix {
            data,
            rows: self.rows,
            cols,
            frac_bits: self.frac_bits,
        })
    }

    /// Exact product with wrapping W-bit multiply-accumulate (the reference result)
    pub fn mul_vec_wrapping(&self, x: &WordVector) -> Result<WordVector> {
        if x.len() != self.cols {
            return Err(FactorError::DimensionMismatch {
                expected: self.cols,
                got: x.len(),
            });
        }

        let width = x.width;
        let data = (0..self.rows)
            .map(|r| {
                (0..self.cols).fold(0i64, |acc, c| {
                    width.add(acc, width.wrap(self.get(r, c).wrapping_mul(x.data[c])))
                })
            })
            .collect();
        Ok(WordVector { data, width })
    }
}
