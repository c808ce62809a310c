//! Reconstruction of a continuous-time waveform from discrete samples.
//!
//! Both kernels take the instants the samples were taken at and the instants
//! the reconstruction is wanted at, so they work on any pair of ascending time
//! axes, not only the ones the engine builds.
//!
//! - **Zero-order hold**: each sample is held until the next sample boundary,
//!   the staircase a DAC sample-and-hold stage produces.
//! - **Sinc interpolation** (Whittaker-Shannon): `x(t) = Σ x[n] sinc((t - nTs) / Ts)`,
//!   exact for a band-limited signal and an infinite sample set.
//!
//! The sinc kernel is evaluated as a dense `(query × sample)` matrix. Cost is
//! `O(M·N)`, which is fine for demonstration-sized axes only.

use crate::error::{DspError, DspResult};
use lib_types::units::Seconds;
use ndarray::{Array2, ArrayView1};
use std::f64::consts::PI;

/// Arguments closer to zero than this evaluate to `sinc(0) = 1`.
const SINC_ZERO_TOLERANCE: f64 = 1e-10;

/// Largest sinc kernel matrix (query instants × samples) built in one go.
pub const MAX_KERNEL_ELEMENTS: usize = 1 << 27;

/// Normalized sinc: `sin(πx) / (πx)`, with `sinc(0) = 1`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < SINC_ZERO_TOLERANCE {
        return 1.0;
    }
    let px = PI * x;
    px.sin() / px
}

fn validate_samples(sample_times: &[f64], samples: &[f64]) -> DspResult<()> {
    if samples.is_empty() {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }
    if samples.len() != sample_times.len() {
        return Err(DspError::LengthMismatch {
            expected: sample_times.len(),
            actual: samples.len(),
        });
    }
    Ok(())
}

/// Index of the sample held at instant `t`.
///
/// The latest sample with `sample_times[n] <= t`, clamped to the valid range so
/// instants before the first sample use sample 0.
#[inline]
fn held_index(sample_times: &[f64], t: f64) -> usize {
    sample_times
        .partition_point(|&s| s <= t)
        .saturating_sub(1)
        .min(sample_times.len() - 1)
}

/// Zero-order-hold reconstruction.
///
/// Each query instant takes the value of the latest sample at or before it, so
/// the output is constant on every `[t_n, t_{n+1})` and every output value is
/// one of the input samples.
///
/// # Errors
///
/// - [`DspError::InsufficientData`] if `samples` is empty
/// - [`DspError::LengthMismatch`] if `samples` and `sample_times` differ in length
pub fn zero_order_hold(
    sample_times: &[f64],
    samples: &[f64],
    query_times: &[f64],
) -> DspResult<Vec<f64>> {
    validate_samples(sample_times, samples)?;

    Ok(query_times
        .iter()
        .map(|&t| samples[held_index(sample_times, t)])
        .collect())
}

/// Whittaker-Shannon (sinc) reconstruction.
///
/// Builds the kernel matrix `K[i][n] = sinc((t_i - t_n) / Ts)` and returns
/// `K · samples`.
///
/// # Arguments
///
/// * `sample_times` - Instants the samples were taken at (`n · Ts`)
/// * `samples` - Sample amplitudes, one per entry of `sample_times`
/// * `period` - Sampling period `Ts`
/// * `query_times` - Instants to reconstruct at
///
/// # Errors
///
/// - [`DspError::InsufficientData`] if `samples` is empty
/// - [`DspError::LengthMismatch`] if `samples` and `sample_times` differ in length
/// - [`DspError::InvalidConfig`] if `period` is not positive and finite, or if
///   the kernel would exceed [`MAX_KERNEL_ELEMENTS`]
pub fn sinc_interpolate(
    sample_times: &[f64],
    samples: &[f64],
    period: Seconds,
    query_times: &[f64],
) -> DspResult<Vec<f64>> {
    validate_samples(sample_times, samples)?;
    if !period.is_positive_finite() {
        return Err(DspError::InvalidConfig(format!(
            "sampling period must be positive, got {}",
            period.0
        )));
    }

    let elements = query_times
        .len()
        .checked_mul(sample_times.len())
        .filter(|&n| n <= MAX_KERNEL_ELEMENTS)
        .ok_or_else(|| {
            DspError::InvalidConfig(format!(
                "sinc kernel of {} x {} exceeds {} elements",
                query_times.len(),
                sample_times.len(),
                MAX_KERNEL_ELEMENTS
            ))
        })?;
    tracing::trace!("sinc kernel: {} elements", elements);

    let ts = period.0;
    let kernel = Array2::from_shape_fn((query_times.len(), sample_times.len()), |(i, n)| {
        sinc((query_times[i] - sample_times[n]) / ts)
    });

    let weights = ArrayView1::from(samples);
    Ok(kernel.dot(&weights).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize, step: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * step).collect()
    }

    #[test]
    fn test_sinc_values() {
        assert_eq!(sinc(0.0), 1.0);

        // Zero at every non-zero integer
        for k in 1..10 {
            assert!(sinc(k as f64).abs() < 1e-12);
            assert!(sinc(-(k as f64)).abs() < 1e-12);
        }

        // sinc(1/2) = 2/π
        assert!((sinc(0.5) - 2.0 / PI).abs() < 1e-12);
        assert!((sinc(0.3) - sinc(-0.3)).abs() < 1e-15);
    }

    #[test]
    fn test_zoh_staircase() {
        let sample_times = vec![0.0, 1.0, 2.0];
        let samples = vec![10.0, 20.0, 30.0];
        let query = vec![0.0, 0.5, 0.999, 1.0, 1.5, 2.0, 2.7, 5.0];

        let held = zero_order_hold(&sample_times, &samples, &query).unwrap();

        // Exact sample instants pick that sample; past the end repeats the last
        assert_eq!(held, vec![10.0, 10.0, 10.0, 20.0, 20.0, 30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_zoh_clamps_before_first_sample() {
        let sample_times = vec![0.5, 1.5];
        let samples = vec![-1.0, 1.0];

        let held = zero_order_hold(&sample_times, &samples, &[0.0, 0.25]).unwrap();
        assert_eq!(held, vec![-1.0, -1.0]);
    }

    #[test]
    fn test_zoh_rejects_empty_samples() {
        let result = zero_order_hold(&[], &[], &[0.0, 0.1]);
        assert!(matches!(
            result,
            Err(DspError::InsufficientData { needed: 1, got: 0 })
        ));
    }

    #[test]
    fn test_zoh_rejects_length_mismatch() {
        let result = zero_order_hold(&[0.0, 1.0, 2.0], &[1.0, 2.0], &[0.5]);
        assert!(matches!(
            result,
            Err(DspError::LengthMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_sinc_interpolation_hits_samples() {
        let ts = 0.1;
        let sample_times = axis(8, ts);
        let samples = vec![0.3, -0.7, 1.0, 0.2, -0.4, 0.9, -1.0, 0.5];

        let rebuilt =
            sinc_interpolate(&sample_times, &samples, Seconds(ts), &sample_times).unwrap();

        for (n, (&expected, &actual)) in samples.iter().zip(rebuilt.iter()).enumerate() {
            assert!(
                (expected - actual).abs() < 1e-9,
                "sample {}: expected {}, got {}",
                n,
                expected,
                actual
            );
        }
    }

    #[test]
    fn test_sinc_interpolation_single_pulse() {
        // One unit sample reproduces the kernel itself
        let ts = 0.25;
        let query = vec![0.0, 0.125, 0.25, -0.125];

        let rebuilt = sinc_interpolate(&[0.0], &[1.0], Seconds(ts), &query).unwrap();

        assert!((rebuilt[0] - 1.0).abs() < 1e-12);
        assert!((rebuilt[1] - 2.0 / PI).abs() < 1e-12);
        assert!(rebuilt[2].abs() < 1e-12);
        assert!((rebuilt[3] - 2.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_sinc_interpolation_errors() {
        assert!(matches!(
            sinc_interpolate(&[], &[], Seconds(0.1), &[0.0]),
            Err(DspError::InsufficientData { .. })
        ));
        assert!(matches!(
            sinc_interpolate(&[0.0], &[1.0, 2.0], Seconds(0.1), &[0.0]),
            Err(DspError::LengthMismatch { .. })
        ));
        assert!(matches!(
            sinc_interpolate(&[0.0], &[1.0], Seconds(0.0), &[0.0]),
            Err(DspError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sinc_interpolation_rejects_oversized_kernel() {
        // 2^13 x 2^15 = 2^28 elements, twice the limit
        let ts = 1e-3;
        let sample_times = axis(1 << 15, ts);
        let samples = vec![0.0; sample_times.len()];
        let query = axis(1 << 13, ts);

        let result = sinc_interpolate(&sample_times, &samples, Seconds(ts), &query);
        assert!(matches!(result, Err(DspError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_query_axis() {
        let held = zero_order_hold(&[0.0], &[1.0], &[]).unwrap();
        assert!(held.is_empty());

        let rebuilt = sinc_interpolate(&[0.0], &[1.0], Seconds(1.0), &[]).unwrap();
        assert!(rebuilt.is_empty());
    }
}
