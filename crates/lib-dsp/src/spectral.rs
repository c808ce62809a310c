//! Power spectral density estimation via Welch's method.
//!
//! The signal is cut into overlapping segments, each segment is detrended,
//! tapered and transformed, and the per-segment periodograms are averaged.
//! Averaging trades frequency resolution for a lower-variance estimate.
//!
//! # Scaling
//!
//! Output is a one-sided density in units²/Hz:
//!
//! ```text
//! P[k] = c_k · mean_s |FFT(w · (x_s - mean(x_s)))[k]|² / (fs · Σw²)
//! ```
//!
//! with `c_k = 2` for every bin except DC (and Nyquist when the segment length
//! is even), so that `Σ P[k] · Δf` equals the mean power of the signal.

use crate::error::{DspError, DspResult};
use crate::fft::{rfft_frequencies, rfft_with_plan, FftEngine};
use crate::window::{generate_periodic_window, window_energy, WindowType};
use lib_types::units::Hertz;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default Welch segment length.
pub const DEFAULT_SEGMENT_LENGTH: usize = 1024;

/// Additive floor applied before converting power to decibels.
pub const DEFAULT_DB_FLOOR: f64 = 1e-12;

/// Per-segment trend removal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detrend {
    /// Use each segment as-is.
    None,
    /// Subtract the segment mean.
    #[default]
    Constant,
}

/// Welch estimator settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WelchConfig {
    /// Samples per segment. Signals shorter than this use their full length.
    pub segment_length: usize,

    /// Samples shared by consecutive segments. `None` means half a segment.
    pub overlap: Option<usize>,

    /// Taper applied to each segment (periodic form).
    pub window: WindowType,

    /// Trend removal applied to each segment before windowing.
    pub detrend: Detrend,

    /// Floor added to linear power before taking the logarithm.
    pub db_floor: f64,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_SEGMENT_LENGTH,
            overlap: None,
            window: WindowType::Hann,
            detrend: Detrend::Constant,
            db_floor: DEFAULT_DB_FLOOR,
        }
    }
}

impl WelchConfig {
    /// Check settings that do not depend on the signal.
    pub fn validate(&self) -> DspResult<()> {
        if self.segment_length == 0 {
            return Err(DspError::InvalidConfig(
                "Welch segment length must be at least 1".into(),
            ));
        }
        if !(self.db_floor.is_finite() && self.db_floor > 0.0) {
            return Err(DspError::InvalidConfig(format!(
                "dB floor must be positive, got {}",
                self.db_floor
            )));
        }
        Ok(())
    }
}

/// Linear power spectral density estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    /// Bin centre frequencies in Hz, ascending from DC.
    pub frequencies: Vec<f64>,

    /// Power density per bin (units²/Hz).
    pub power: Vec<f64>,

    /// Segment length actually used.
    pub segment_length: usize,

    /// Number of averaged segments.
    pub segments: usize,
}

impl Psd {
    /// Number of frequency bins.
    pub fn len(&self) -> usize {
        self.power.len()
    }

    /// True when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Frequency spacing between bins.
    pub fn resolution(&self) -> f64 {
        match self.frequencies.get(1) {
            Some(&f1) => f1 - self.frequencies[0],
            None => 0.0,
        }
    }

    /// Integrated power in the closed band `[low, high]` Hz.
    pub fn band_power(&self, low: f64, high: f64) -> f64 {
        let df = self.resolution();
        self.frequencies
            .iter()
            .zip(self.power.iter())
            .filter(|(&f, _)| f >= low && f <= high)
            .map(|(_, &p)| p * df)
            .sum()
    }

    /// Convert to a decibel spectrum with the given floor.
    pub fn to_db(&self, floor: f64) -> DecibelSpectrum {
        DecibelSpectrum {
            frequencies: self.frequencies.clone(),
            power_db: power_db(&self.power, floor),
        }
    }
}

/// Frequency / decibel pair, ready for plotting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecibelSpectrum {
    /// Bin centre frequencies in Hz.
    pub frequencies: Vec<f64>,

    /// `10 · log10(power + floor)` per bin.
    pub power_db: Vec<f64>,
}

impl DecibelSpectrum {
    /// Number of frequency bins.
    pub fn len(&self) -> usize {
        self.power_db.len()
    }

    /// True when there are no bins.
    pub fn is_empty(&self) -> bool {
        self.power_db.is_empty()
    }

    /// Frequency and level of the strongest bin.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .copied()
            .zip(self.power_db.iter().copied())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Split into the `(frequencies, decibels)` pair.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.frequencies, self.power_db)
    }
}

/// Convert linear power to decibels: `10 · log10(p + floor)`.
pub fn power_db(power: &[f64], floor: f64) -> Vec<f64> {
    power.iter().map(|&p| 10.0 * (p + floor).log10()).collect()
}

/// Estimate the power spectral density of `signal` sampled at `sample_rate`.
///
/// # Errors
///
/// - [`DspError::InsufficientData`] for an empty signal
/// - [`DspError::InvalidConfig`] for a non-positive sample rate or segment length
pub fn welch(signal: &[f64], sample_rate: Hertz, config: &WelchConfig) -> DspResult<Psd> {
    if signal.is_empty() {
        return Err(DspError::InsufficientData { needed: 1, got: 0 });
    }
    if !sample_rate.is_positive_finite() {
        return Err(DspError::InvalidConfig(format!(
            "sample rate must be positive, got {}",
            sample_rate.0
        )));
    }
    config.validate()?;

    let segment_length = config.segment_length.min(signal.len());
    if segment_length < config.segment_length {
        tracing::debug!(
            "Welch: segment length {} exceeds signal length {}, using {}",
            config.segment_length,
            signal.len(),
            segment_length
        );
    }

    let overlap = config
        .overlap
        .unwrap_or(segment_length / 2)
        .min(segment_length - 1);
    let step = segment_length - overlap;
    let segments = (signal.len() - overlap) / step;

    let window = generate_periodic_window(config.window, segment_length);
    let energy = window_energy(&window);
    if energy <= 0.0 {
        return Err(DspError::NumericalInstability(
            "window has zero energy".into(),
        ));
    }

    let mut engine = FftEngine::new();
    let plan = engine.plan_forward(segment_length)?;

    // Segments are independent; collect keeps them in order so the sum below
    // is reproducible bit for bit.
    let periodograms = (0..segments)
        .into_par_iter()
        .map(|s| -> DspResult<Vec<f64>> {
            let segment = &signal[s * step..s * step + segment_length];
            let offset = match config.detrend {
                Detrend::None => 0.0,
                Detrend::Constant => segment.iter().sum::<f64>() / segment_length as f64,
            };
            let tapered: Vec<f64> = segment
                .iter()
                .zip(window.iter())
                .map(|(&x, &w)| (x - offset) * w)
                .collect();

            let spectrum = rfft_with_plan(plan.as_ref(), &tapered)?;
            Ok(spectrum.iter().map(|c| c.norm_sqr()).collect())
        })
        .collect::<DspResult<Vec<_>>>()?;

    let bins = segment_length / 2 + 1;
    let mut power = vec![0.0; bins];
    for periodogram in &periodograms {
        for (acc, &p) in power.iter_mut().zip(periodogram.iter()) {
            *acc += p;
        }
    }

    let scale = 1.0 / (sample_rate.0 * energy * segments as f64);
    let last_doubled = if segment_length % 2 == 0 { bins - 1 } else { bins };
    for (k, p) in power.iter_mut().enumerate() {
        *p *= scale;
        if k > 0 && k < last_doubled {
            *p *= 2.0;
        }
    }

    tracing::trace!(
        "Welch: {} segments of {} samples, overlap {}, {} bins",
        segments,
        segment_length,
        overlap,
        bins
    );

    Ok(Psd {
        frequencies: rfft_frequencies(segment_length, sample_rate.0),
        power,
        segment_length,
        segments,
    })
}
