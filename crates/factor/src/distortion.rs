//! Approximation quality metrics

use crate::error::{FactorError, Result};

/// Signal-to-quantization-noise ratio in dB between a reference and its approximation.
///
/// Returns `f64::INFINITY` when the approximation is exact.
pub fn sqnr_db(reference: &[f64], approx: &[f64]) -> Result<f64> {
    if reference.len() != approx.len() {
        return Err(FactorError::DimensionMismatch {
            expected: reference.len(),
            got: approx.len(),
        });
    }

    let signal: f64 = reference.iter().map(|x| x * x).sum();
    let noise: f64 = reference
        .iter()
        .zip(approx)
        .map(|(r, a)| (r - a) * (r - a))
        .sum();

    if noise == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (signal / noise).log10())
}
