//! Lab configuration loading and validation.

use anyhow::{Context, Result};
use lib_dsp::engine::EngineConfig;
use lib_dsp::spectral::WelchConfig;
use lib_types::units::{Hertz, Seconds};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level lab configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabConfig {
    /// Run name/description.
    #[serde(default = "default_name")]
    pub name: String,

    /// Tone and ADC parameters.
    #[serde(default)]
    pub signal: SignalParams,

    /// Error and spectrum analysis settings.
    #[serde(default)]
    pub analysis: AnalysisParams,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            signal: SignalParams::default(),
            analysis: AnalysisParams::default(),
        }
    }
}

fn default_name() -> String {
    "reconstruction".to_string()
}

/// Tone and ADC parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignalParams {
    /// Tone frequency (Hz).
    #[serde(default = "default_signal_frequency")]
    pub signal_frequency: f64,

    /// ADC sampling frequency (Hz).
    #[serde(default = "default_sampling_frequency")]
    pub sampling_frequency: f64,

    /// Observation window (s).
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Density of the simulated analog signal (Hz).
    #[serde(default = "default_analog_resolution")]
    pub analog_resolution: f64,
}

fn default_signal_frequency() -> f64 { 5.0 }
fn default_sampling_frequency() -> f64 { 25.0 }
fn default_duration() -> f64 { 0.5 }
fn default_analog_resolution() -> f64 { lib_dsp::DEFAULT_ANALOG_RESOLUTION.0 }

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            signal_frequency: default_signal_frequency(),
            sampling_frequency: default_sampling_frequency(),
            duration: default_duration(),
            analog_resolution: default_analog_resolution(),
        }
    }
}

impl SignalParams {
    /// Engine configuration for these parameters.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            Hertz(self.signal_frequency),
            Hertz(self.sampling_frequency),
            Seconds(self.duration),
        )
        .with_analog_resolution(Hertz(self.analog_resolution))
    }
}

/// Error and spectrum analysis settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Fraction of the window ignored at each end for the interior error.
    #[serde(default = "default_edge_fraction")]
    pub edge_fraction: f64,

    /// Welch estimator settings.
    #[serde(default)]
    pub welch: WelchConfig,
}

fn default_edge_fraction() -> f64 { 0.1 }

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            edge_fraction: default_edge_fraction(),
            welch: WelchConfig::default(),
        }
    }
}

/// On-disk config encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// JSON for `.json` files, TOML otherwise.
    pub fn from_path(path: &Path) -> Self {
        if path.extension().map_or(false, |e| e == "json") {
            Self::Json
        } else {
            Self::Toml
        }
    }
}

/// Load configuration from a file.
pub fn load_config(path: &Path) -> Result<LabConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse configuration text without validating it.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LabConfig> {
    let config: LabConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)
            .with_context(|| "Failed to parse config as JSON")?,
        ConfigFormat::Toml => toml::from_str(content)
            .with_context(|| "Failed to parse config as TOML")?,
    };
    Ok(config)
}

/// Validate configuration.
pub fn validate_config(config: &LabConfig) -> Result<()> {
    config
        .signal
        .engine_config()
        .validate()
        .context("Invalid signal parameters")?;

    let edge = config.analysis.edge_fraction;
    if !(0.0..0.5).contains(&edge) {
        anyhow::bail!("edge_fraction must be in [0, 0.5), got {}", edge);
    }

    config
        .analysis
        .welch
        .validate()
        .context("Invalid Welch settings")?;

    if !config.signal.engine_config().satisfies_nyquist() {
        tracing::warn!(
            "Fs ({} Hz) < 2 * f ({} Hz): aliasing expected",
            config.signal.sampling_frequency,
            2.0 * config.signal.signal_frequency
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_dsp::spectral::Detrend;
    use lib_dsp::window::WindowType;

    #[test]
    fn test_defaults_match_lab_preset() {
        let config = LabConfig::default();
        assert_eq!(config.signal.signal_frequency, 5.0);
        assert_eq!(config.signal.sampling_frequency, 25.0);
        assert_eq!(config.signal.duration, 0.5);
        assert_eq!(config.signal.analog_resolution, 2000.0);
        assert_eq!(config.analysis.welch.segment_length, 1024);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            name = "aliasing"

            [signal]
            signal_frequency = 10.0
            sampling_frequency = 15.0

            [analysis.welch]
            segment_length = 256
            window = { type = "blackman" }
            detrend = "none"
        "#;

        let config = parse_config(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.name, "aliasing");
        assert_eq!(config.signal.signal_frequency, 10.0);
        assert_eq!(config.signal.duration, 0.5);
        assert_eq!(config.analysis.edge_fraction, 0.1);
        assert_eq!(config.analysis.welch.segment_length, 256);
        assert_eq!(config.analysis.welch.window, WindowType::Blackman);
        assert_eq!(config.analysis.welch.detrend, Detrend::None);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"signal": {"signal_frequency": 3.0, "duration": 1.0}}"#;
        let config = parse_config(json, ConfigFormat::Json).unwrap();

        assert_eq!(config.name, "reconstruction");
        assert_eq!(config.signal.signal_frequency, 3.0);
        assert_eq!(config.signal.sampling_frequency, 25.0);

        let engine_config = config.signal.engine_config();
        assert_eq!(engine_config.duration, Seconds(1.0));
        assert_eq!(engine_config.analog_resolution, Hertz(2000.0));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("lab.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("lab.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("lab")), ConfigFormat::Toml);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = LabConfig::default();
        config.signal.duration = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = LabConfig::default();
        config.signal.sampling_frequency = -25.0;
        assert!(validate_config(&config).is_err());

        let mut config = LabConfig::default();
        config.analysis.edge_fraction = 0.5;
        assert!(validate_config(&config).is_err());

        let mut config = LabConfig::default();
        config.analysis.welch.segment_length = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_malformed_text_rejected() {
        assert!(parse_config("signal = [", ConfigFormat::Toml).is_err());
        assert!(parse_config("{", ConfigFormat::Json).is_err());
    }
}
