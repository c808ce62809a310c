//! Real-input FFT operations using realfft.
//!
//! This module provides a thin wrapper around realfft with:
//! - Planner caching for repeated transforms of the same length
//! - Arbitrary (non power-of-two) transform lengths
//! - Plans shared across threads and one-sided bin frequencies

use crate::error::{DspError, DspResult};
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// FFT engine with a cached real-to-complex planner.
pub struct FftEngine {
    real_planner: RealFftPlanner<f64>,
}

impl FftEngine {
    /// Create a new FFT engine.
    pub fn new() -> Self {
        Self {
            real_planner: RealFftPlanner::new(),
        }
    }

    /// Get a cached forward real-to-complex plan.
    pub fn plan_forward(&mut self, len: usize) -> DspResult<Arc<dyn RealToComplex<f64>>> {
        if len == 0 {
            return Err(DspError::InvalidFftSize(len));
        }
        Ok(self.real_planner.plan_fft_forward(len))
    }
}

impl Default for FftEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a prepared forward plan over `data`.
///
/// The plan length must equal `data.len()`.
pub fn rfft_with_plan(plan: &dyn RealToComplex<f64>, data: &[f64]) -> DspResult<Vec<Complex64>> {
    if plan.len() != data.len() {
        return Err(DspError::LengthMismatch {
            expected: plan.len(),
            actual: data.len(),
        });
    }

    let mut input = data.to_vec();
    let mut output = plan.make_output_vec();

    plan.process(&mut input, &mut output)
        .map_err(|e| DspError::NumericalInstability(e.to_string()))?;

    Ok(output)
}

/// Centre frequency of each one-sided bin of an `n`-point real FFT.
///
/// Returns `n/2 + 1` values `k * fs / n`.
pub fn rfft_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let df = sample_rate / n as f64;
    (0..=n / 2).map(|k| k as f64 * df).collect()
}
