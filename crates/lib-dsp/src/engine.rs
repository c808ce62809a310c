//! Sampling and reconstruction engine.
//!
//! A [`ReconstructionEngine`] is built once per parameter set. It fixes two
//! time axes at construction:
//!
//! - the **analog** axis: `floor(analog_resolution · duration)` evenly spaced
//!   instants covering `[0, duration)`, dense enough to stand in for
//!   continuous time
//! - the **sample** axis: `0, Ts, 2Ts, ...` strictly below `duration`, the
//!   instants an ideal ADC running at `sampling_frequency` captures
//!
//! Every operation is a pure function of the configuration and these axes.
//! Changing a parameter means building a new engine.
//!
//! # Example
//!
//! ```
//! use lib_dsp::engine::{EngineConfig, ReconstructionEngine};
//! use lib_types::units::{Hertz, Seconds};
//!
//! let config = EngineConfig::new(Hertz(5.0), Hertz(25.0), Seconds(0.5));
//! let engine = ReconstructionEngine::new(config).unwrap();
//!
//! let samples = engine.samples();
//! let staircase = engine.reconstruct_zoh(&samples).unwrap();
//! let smooth = engine.reconstruct_sinc(&samples).unwrap();
//!
//! assert_eq!(samples.len(), 13);
//! assert_eq!(staircase.len(), engine.analog_time_axis().len());
//! assert_eq!(smooth.len(), staircase.len());
//! ```

use crate::error::{DspError, DspResult};
use crate::reconstruction::{sinc_interpolate, zero_order_hold};
use crate::spectral::{welch, DecibelSpectrum, Psd, WelchConfig};
use lib_types::units::{Hertz, Seconds};
use lib_types::waveform::Waveform;
use serde::{Deserialize, Serialize};

/// Resolution of the simulated analog signal when none is given.
pub const DEFAULT_ANALOG_RESOLUTION: Hertz = Hertz(2000.0);

/// Longest analog or sample axis an engine will build (2^24 instants).
pub const MAX_AXIS_LEN: usize = 1 << 24;

/// Length of an axis spanning `points` instants, bounded by [`MAX_AXIS_LEN`].
fn axis_len(name: &str, points: f64) -> DspResult<usize> {
    if !points.is_finite() || points > MAX_AXIS_LEN as f64 {
        return Err(DspError::InvalidConfig(format!(
            "{} axis would hold {:e} instants, limit is {}",
            name, points, MAX_AXIS_LEN
        )));
    }
    Ok(points as usize)
}

fn default_analog_resolution() -> Hertz {
    DEFAULT_ANALOG_RESOLUTION
}

/// Parameters fixed for the lifetime of one engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Frequency of the test sinusoid.
    pub signal_frequency: Hertz,

    /// ADC sampling frequency.
    pub sampling_frequency: Hertz,

    /// Observation window length.
    pub duration: Seconds,

    /// Point density of the simulated analog signal.
    #[serde(default = "default_analog_resolution")]
    pub analog_resolution: Hertz,
}

impl EngineConfig {
    /// Configuration with the default analog resolution.
    pub fn new(signal_frequency: Hertz, sampling_frequency: Hertz, duration: Seconds) -> Self {
        Self {
            signal_frequency,
            sampling_frequency,
            duration,
            analog_resolution: DEFAULT_ANALOG_RESOLUTION,
        }
    }

    /// Override the analog resolution.
    pub fn with_analog_resolution(mut self, analog_resolution: Hertz) -> Self {
        self.analog_resolution = analog_resolution;
        self
    }

    /// Minimum sampling frequency that avoids aliasing (`2 · signal_frequency`).
    pub fn nyquist_rate(&self) -> Hertz {
        self.signal_frequency * 2.0
    }

    /// Whether `sampling_frequency >= 2 · signal_frequency`.
    pub fn satisfies_nyquist(&self) -> bool {
        self.sampling_frequency.0 >= self.nyquist_rate().0
    }

    /// Reject non-positive or non-finite parameters.
    pub fn validate(&self) -> DspResult<()> {
        let frequencies = [
            ("signal frequency", self.signal_frequency),
            ("sampling frequency", self.sampling_frequency),
            ("analog resolution", self.analog_resolution),
        ];
        for (name, value) in frequencies {
            if !value.is_positive_finite() {
                return Err(DspError::InvalidConfig(format!(
                    "{} must be positive and finite, got {} Hz",
                    name, value.0
                )));
            }
        }

        if !self.duration.is_positive_finite() {
            return Err(DspError::InvalidConfig(format!(
                "duration must be positive and finite, got {} s",
                self.duration.0
            )));
        }

        Ok(())
    }
}

/// Signal generation, reconstruction and spectral estimation over fixed axes.
#[derive(Clone, Debug)]
pub struct ReconstructionEngine {
    config: EngineConfig,

    /// Sampling period `Ts = 1 / sampling_frequency`.
    sample_period: Seconds,

    /// Spacing of the analog axis (`duration / analog_len`).
    analog_step: Seconds,

    analog_time_axis: Vec<f64>,
    sample_time_axis: Vec<f64>,
}

impl ReconstructionEngine {
    /// Validate `config` and precompute both time axes.
    ///
    /// # Errors
    ///
    /// [`DspError::InvalidConfig`] if any parameter is non-positive or
    /// non-finite, if `analog_resolution · duration < 1` leaves the analog
    /// axis empty, or if either axis would exceed [`MAX_AXIS_LEN`].
    pub fn new(config: EngineConfig) -> DspResult<Self> {
        config.validate()?;

        let duration = config.duration.0;
        let analog_points = (config.analog_resolution.0 * duration).floor();
        if analog_points < 1.0 {
            return Err(DspError::InvalidConfig(format!(
                "analog resolution {} Hz over {} s yields no analog instants",
                config.analog_resolution.0, duration
            )));
        }
        let analog_len = axis_len("analog", analog_points)?;
        let analog_step = Seconds(duration / analog_len as f64);
        let analog_time_axis: Vec<f64> = (0..analog_len)
            .map(|i| i as f64 * analog_step.0)
            .collect();

        let sample_period = config.sampling_frequency.to_period();
        let sample_count = axis_len("sample", (duration / sample_period.0).ceil())?;
        let sample_time_axis: Vec<f64> = (0..sample_count)
            .map(|n| n as f64 * sample_period.0)
            .take_while(|&t| t < duration)
            .collect();

        tracing::debug!(
            "ReconstructionEngine: f={} Hz, fs={} Hz, {} analog instants, {} samples, Ts={:.3} ms",
            config.signal_frequency.0,
            config.sampling_frequency.0,
            analog_time_axis.len(),
            sample_time_axis.len(),
            sample_period.as_ms()
        );

        if !config.satisfies_nyquist() {
            tracing::warn!(
                "Sampling at {} Hz is below the Nyquist rate {} Hz; reconstructions will alias",
                config.sampling_frequency.0,
                config.nyquist_rate().0
            );
        }
        if config.analog_resolution.0 < config.nyquist_rate().0 {
            tracing::warn!(
                "Analog resolution {} Hz under-resolves a {} Hz tone; ground truth is itself aliased",
                config.analog_resolution.0,
                config.signal_frequency.0
            );
        }

        Ok(Self {
            config,
            sample_period,
            analog_step,
            analog_time_axis,
            sample_time_axis,
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Instants of the simulated analog signal, ascending in `[0, duration)`.
    pub fn analog_time_axis(&self) -> &[f64] {
        &self.analog_time_axis
    }

    /// Sampling instants `n · Ts`, ascending and strictly below `duration`.
    pub fn sample_time_axis(&self) -> &[f64] {
        &self.sample_time_axis
    }

    /// Sampling period `Ts`.
    pub fn sample_period(&self) -> Seconds {
        self.sample_period
    }

    /// Spacing of the analog axis.
    pub fn analog_step(&self) -> Seconds {
        self.analog_step
    }

    /// See [`EngineConfig::nyquist_rate`].
    pub fn nyquist_rate(&self) -> Hertz {
        self.config.nyquist_rate()
    }

    /// See [`EngineConfig::satisfies_nyquist`].
    pub fn nyquist_satisfied(&self) -> bool {
        self.config.satisfies_nyquist()
    }

    fn tone(&self, times: &[f64]) -> Vec<f64> {
        let omega = self.config.signal_frequency.angular();
        times.iter().map(|&t| (omega * t).sin()).collect()
    }

    /// `sin(2π f t)` at every analog instant.
    pub fn ground_truth(&self) -> Vec<f64> {
        self.tone(&self.analog_time_axis)
    }

    /// `sin(2π f t)` at every sampling instant: an ideal, noiseless ADC.
    pub fn samples(&self) -> Vec<f64> {
        self.tone(&self.sample_time_axis)
    }

    /// Zero-order-hold reconstruction onto the analog axis.
    ///
    /// # Errors
    ///
    /// - [`DspError::InsufficientData`] for an empty `samples`
    /// - [`DspError::LengthMismatch`] if `samples` does not match the sample axis
    pub fn reconstruct_zoh(&self, samples: &[f64]) -> DspResult<Vec<f64>> {
        zero_order_hold(&self.sample_time_axis, samples, &self.analog_time_axis)
    }

    /// Sinc (Whittaker-Shannon) reconstruction onto the analog axis.
    ///
    /// # Errors
    ///
    /// Same as [`ReconstructionEngine::reconstruct_zoh`], plus
    /// [`DspError::InvalidConfig`] when analog instants × samples exceeds
    /// [`crate::reconstruction::MAX_KERNEL_ELEMENTS`].
    pub fn reconstruct_sinc(&self, samples: &[f64]) -> DspResult<Vec<f64>> {
        sinc_interpolate(
            &self.sample_time_axis,
            samples,
            self.sample_period,
            &self.analog_time_axis,
        )
    }

    /// Welch PSD in decibels of a signal taken at the analog resolution.
    ///
    /// Segment length 1024 (or the whole signal if shorter), half overlap,
    /// Hann window, floor `1e-12` before the logarithm.
    pub fn psd(&self, signal: &[f64]) -> DspResult<DecibelSpectrum> {
        self.psd_with(signal, &WelchConfig::default())
    }

    /// [`ReconstructionEngine::psd`] with custom estimator settings.
    pub fn psd_with(&self, signal: &[f64], config: &WelchConfig) -> DspResult<DecibelSpectrum> {
        let psd = self.estimate_psd(signal, config)?;
        Ok(psd.to_db(config.db_floor))
    }

    /// Linear Welch PSD of a signal taken at the analog resolution.
    pub fn estimate_psd(&self, signal: &[f64], config: &WelchConfig) -> DspResult<Psd> {
        welch(signal, self.config.analog_resolution, config)
    }

    /// Wrap values aligned to the analog axis as a [`Waveform`].
    pub fn analog_waveform(&self, values: Vec<f64>) -> DspResult<Waveform> {
        if values.len() != self.analog_time_axis.len() {
            return Err(DspError::LengthMismatch {
                expected: self.analog_time_axis.len(),
                actual: values.len(),
            });
        }
        Ok(Waveform::new(values, self.analog_step, Seconds::ZERO))
    }

    /// Wrap values aligned to the sample axis as a [`Waveform`].
    pub fn sample_waveform(&self, values: Vec<f64>) -> DspResult<Waveform> {
        if values.len() != self.sample_time_axis.len() {
            return Err(DspError::LengthMismatch {
                expected: self.sample_time_axis.len(),
                actual: values.len(),
            });
        }
        Ok(Waveform::new(values, self.sample_period, Seconds::ZERO))
    }
}
