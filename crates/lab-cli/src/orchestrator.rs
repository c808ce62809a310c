//! Reconstruction run orchestration.
//!
//! Drives the engine in the order the lab presents results: ground truth,
//! samples, both reconstructions, then the spectrum of each.

use crate::config::LabConfig;
use anyhow::{Context, Result};
use lib_dsp::engine::ReconstructionEngine;
use lib_dsp::metrics::{interior_mean_absolute_error, max_absolute_error, mean_absolute_error};
use lib_dsp::spectral::{DecibelSpectrum, Psd};
use lib_types::waveform::Waveform;
use serde::Serialize;

/// Signals that live on the analog time axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SignalKind {
    GroundTruth,
    Zoh,
    Sinc,
}

impl SignalKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GroundTruth => "ground_truth",
            Self::Zoh => "zoh",
            Self::Sinc => "sinc",
        }
    }
}

/// Any series the lab can print, including the discrete samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SeriesKind {
    GroundTruth,
    Samples,
    Zoh,
    Sinc,
}

impl SeriesKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GroundTruth => "ground_truth",
            Self::Samples => "samples",
            Self::Zoh => "zoh",
            Self::Sinc => "sinc",
        }
    }
}

/// Nyquist check shown next to the sampling controls.
#[derive(Clone, Debug, Serialize)]
pub struct NyquistReport {
    pub signal_frequency: f64,
    pub sampling_frequency: f64,
    pub nyquist_rate: f64,
    pub satisfied: bool,
}

/// Per-signal summary.
#[derive(Clone, Debug, Serialize)]
pub struct SignalReport {
    pub label: &'static str,
    pub rms: f64,
    pub peak_to_peak: f64,

    /// Error against the ground truth; `None` for the ground truth itself.
    pub mean_abs_error: Option<f64>,
    pub interior_mean_abs_error: Option<f64>,
    pub max_abs_error: Option<f64>,

    pub psd_peak_hz: f64,
    pub psd_peak_db: f64,

    /// Power above the ADC Nyquist frequency (spectral images).
    pub image_power: f64,
}

/// Results of a full run.
#[derive(Clone, Debug, Serialize)]
pub struct LabResults {
    pub name: String,
    pub nyquist: NyquistReport,
    pub analog_points: usize,
    pub sample_count: usize,
    pub signals: Vec<SignalReport>,
}

/// Lab run orchestrator.
pub struct Orchestrator {
    config: LabConfig,
    engine: ReconstructionEngine,
}

impl Orchestrator {
    /// Build the engine for a validated configuration.
    pub fn new(config: LabConfig) -> Result<Self> {
        let engine = ReconstructionEngine::new(config.signal.engine_config())
            .context("Failed to build reconstruction engine")?;
        Ok(Self { config, engine })
    }

    /// The engine this run uses.
    pub fn engine(&self) -> &ReconstructionEngine {
        &self.engine
    }

    /// Run the full pipeline and summarize it.
    pub fn run(&self) -> Result<LabResults> {
        tracing::info!("Starting run: {}", self.config.name);

        let engine = &self.engine;
        let ground_truth = engine.ground_truth();
        let samples = engine.samples();
        let zoh = engine.reconstruct_zoh(&samples)?;
        let sinc = engine.reconstruct_sinc(&samples)?;

        let nyquist = NyquistReport {
            signal_frequency: engine.config().signal_frequency.0,
            sampling_frequency: engine.config().sampling_frequency.0,
            nyquist_rate: engine.nyquist_rate().0,
            satisfied: engine.nyquist_satisfied(),
        };
        if nyquist.satisfied {
            tracing::info!(
                "Nyquist satisfied: Fs ({} Hz) >= 2 * f ({} Hz)",
                nyquist.sampling_frequency,
                nyquist.nyquist_rate
            );
        }

        let signals = vec![
            self.report(SignalKind::GroundTruth, &ground_truth, &ground_truth)?,
            self.report(SignalKind::Zoh, &zoh, &ground_truth)?,
            self.report(SignalKind::Sinc, &sinc, &ground_truth)?,
        ];

        tracing::info!("Run complete");
        Ok(LabResults {
            name: self.config.name.clone(),
            nyquist,
            analog_points: engine.analog_time_axis().len(),
            sample_count: samples.len(),
            signals,
        })
    }

    fn report(
        &self,
        kind: SignalKind,
        signal: &[f64],
        ground_truth: &[f64],
    ) -> Result<SignalReport> {
        let psd = self.estimate(signal)?;
        let (psd_peak_hz, psd_peak_db) = psd
            .to_db(self.config.analysis.welch.db_floor)
            .peak()
            .context("PSD has no bins")?;

        let adc_nyquist = self.engine.config().sampling_frequency.0 / 2.0;
        let image_power = psd.band_power(adc_nyquist, f64::INFINITY);

        let errors = if kind == SignalKind::GroundTruth {
            None
        } else {
            Some((
                mean_absolute_error(ground_truth, signal)?,
                interior_mean_absolute_error(
                    ground_truth,
                    signal,
                    self.config.analysis.edge_fraction,
                )?,
                max_absolute_error(ground_truth, signal)?,
            ))
        };

        if let Some((mae, interior, _)) = errors {
            tracing::debug!(
                "{}: MAE {:.4}, interior MAE {:.4}, image power {:.3e}",
                kind.label(),
                mae,
                interior,
                image_power
            );
        }

        let waveform = self.engine.analog_waveform(signal.to_vec())?;
        Ok(SignalReport {
            label: kind.label(),
            rms: waveform.rms(),
            peak_to_peak: waveform.peak_to_peak(),
            mean_abs_error: errors.map(|e| e.0),
            interior_mean_abs_error: errors.map(|e| e.1),
            max_abs_error: errors.map(|e| e.2),
            psd_peak_hz,
            psd_peak_db,
            image_power,
        })
    }

    fn estimate(&self, signal: &[f64]) -> Result<Psd> {
        Ok(self
            .engine
            .estimate_psd(signal, &self.config.analysis.welch)?)
    }

    fn analog_signal(&self, kind: SignalKind) -> Result<Vec<f64>> {
        let engine = &self.engine;
        Ok(match kind {
            SignalKind::GroundTruth => engine.ground_truth(),
            SignalKind::Zoh => engine.reconstruct_zoh(&engine.samples())?,
            SignalKind::Sinc => engine.reconstruct_sinc(&engine.samples())?,
        })
    }

    /// One series with its time axis.
    pub fn series(&self, kind: SeriesKind) -> Result<Waveform> {
        let engine = &self.engine;
        let waveform = match kind {
            SeriesKind::Samples => engine.sample_waveform(engine.samples())?,
            SeriesKind::GroundTruth => {
                engine.analog_waveform(self.analog_signal(SignalKind::GroundTruth)?)?
            }
            SeriesKind::Zoh => engine.analog_waveform(self.analog_signal(SignalKind::Zoh)?)?,
            SeriesKind::Sinc => engine.analog_waveform(self.analog_signal(SignalKind::Sinc)?)?,
        };
        Ok(waveform)
    }

    /// Decibel PSD of one analog-axis signal.
    pub fn spectrum(&self, kind: SignalKind) -> Result<DecibelSpectrum> {
        let signal = self.analog_signal(kind)?;
        Ok(self
            .engine
            .psd_with(&signal, &self.config.analysis.welch)?)
    }
}
