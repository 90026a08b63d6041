//! Canonical signed digit decomposition of constant coefficients

use cmvm_fixed_point::BitWidth;

use crate::entry::{FactorEntry, Sign};
use crate::error::{FactorError, Result};
use crate::matrix::CoefficientMatrix;
use crate::table::{FactorTable, TableShape, Term};

/// Non-adjacent form of `value` as signed power-of-two digits, lowest shift first.
///
/// The digits sum to `value`, no two consecutive positions are both non-zero,
/// and the digit count is minimal among signed-binary representations.
pub fn csd_digits(value: i64) -> Vec<FactorEntry> {
    let mut digits = Vec::new();
    let mut n = value as i128;
    let mut shift = 0u32;
    while n != 0 {
        if n & 1 == 1 {
            // n mod 4 == 1 -> +1, n mod 4 == 3 -> -1
            let digit = 2 - n.rem_euclid(4);
            n -= digit;
            let sign = if digit > 0 { Sign::Positive } else { Sign::Negative };
            digits.push(FactorEntry { shift, sign });
        }
        n >>= 1;
        shift += 1;
    }
    digits
}

/// Digits of a coefficient that survive W-bit truncation
fn truncated_digits(value: i64, width: BitWidth) -> Vec<FactorEntry> {
    csd_digits(value)
        .into_iter()
        .filter(|d| d.shift < width.bits())
        .collect()
}

fn check_range(matrix: &CoefficientMatrix, width: BitWidth) -> Result<()> {
    for r in 0..matrix.rows {
        for c in 0..matrix.cols {
            let value = matrix.get(r, c);
            if !width.contains(value) {
                return Err(FactorError::CoefficientOutOfRange {
                    row: r,
                    col: c,
                    value,
                    width: width.bits(),
                });
            }
        }
    }
    Ok(())
}

/// Number of digit planes needed to hold every coefficient of `matrix`
pub fn required_planes(matrix: &CoefficientMatrix, width: BitWidth) -> Result<usize> {
    check_range(matrix, width)?;
    Ok(matrix
        .data
        .iter()
        .map(|&v| truncated_digits(v, width).len())
        .max()
        .unwrap_or(0))
}

/// Decompose `matrix` into a factor table with exactly `planes` digit planes.
///
/// Digit `k` of coefficient (r, c) lands in plane `k`. Processing the table
/// reproduces the wrapping integer product with `matrix`.
pub fn decompose_into(
    matrix: &CoefficientMatrix,
    width: BitWidth,
    planes: usize,
) -> Result<FactorTable> {
    let needed = required_planes(matrix, width)?;
    let shape = TableShape::new(planes, matrix.rows, matrix.cols);
    if needed > planes {
        return Err(FactorError::ShapeMismatch {
            expected: shape,
            got: TableShape::new(needed, matrix.rows, matrix.cols),
        });
    }

    let mut terms = Vec::new();
    for row in 0..matrix.rows {
        for col in 0..matrix.cols {
            let digits = truncated_digits(matrix.get(row, col), width);
            terms.extend(digits.into_iter().enumerate().map(|(plane, entry)| Term {
                plane,
                row,
                col,
                entry,
            }));
        }
    }

    tracing::debug!(
        shape = %shape,
        terms = terms.len(),
        "Decomposed coefficient matrix"
    );
    FactorTable::from_terms(shape, width, terms)
}

/// Decompose with the smallest plane count that fits (at least one)
pub fn decompose(matrix: &CoefficientMatrix, width: BitWidth) -> Result<FactorTable> {
    let planes = required_planes(matrix, width)?.max(1);
    decompose_into(matrix, width, planes)
}
