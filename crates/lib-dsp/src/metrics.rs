//! Error measures between a reconstruction and its reference.

use crate::error::{DspError, DspResult};

fn check_pair(reference: &[f64], estimate: &[f64]) -> DspResult<()> {
    if reference.len() != estimate.len() {
        return Err(DspError::LengthMismatch {
            expected: reference.len(),
            actual: estimate.len(),
        });
    }
    if reference.is_empty() {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(())
}

/// Mean of `|reference[i] - estimate[i]|`.
pub fn mean_absolute_error(reference: &[f64], estimate: &[f64]) -> DspResult<f64> {
    check_pair(reference, estimate)?;
    let total: f64 = reference
        .iter()
        .zip(estimate.iter())
        .map(|(r, e)| (r - e).abs())
        .sum();
    Ok(total / reference.len() as f64)
}

/// Largest `|reference[i] - estimate[i]|`.
pub fn max_absolute_error(reference: &[f64], estimate: &[f64]) -> DspResult<f64> {
    check_pair(reference, estimate)?;
    Ok(reference
        .iter()
        .zip(estimate.iter())
        .map(|(r, e)| (r - e).abs())
        .fold(0.0, f64::max))
}

/// Mean absolute error away from the window edges.
///
/// Drops `floor(len · edge_fraction)` points from each end before averaging,
/// which excludes the truncation error a finite sinc sum shows near the ends
/// of the observation window.
///
/// `edge_fraction` must lie in `[0, 0.5)`.
pub fn interior_mean_absolute_error(
    reference: &[f64],
    estimate: &[f64],
    edge_fraction: f64,
) -> DspResult<f64> {
    check_pair(reference, estimate)?;
    if !(0.0..0.5).contains(&edge_fraction) {
        return Err(DspError::InvalidConfig(format!(
            "edge fraction must be in [0, 0.5), got {}",
            edge_fraction
        )));
    }

    let edge = (reference.len() as f64 * edge_fraction).floor() as usize;
    let end = reference.len() - edge;
    mean_absolute_error(&reference[edge..end], &estimate[edge..end])
}
