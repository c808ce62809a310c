//! recon-lab CLI: sampling and reconstruction explorer.
//!
//! Builds a reconstruction engine from flags or a config file and prints
//! summaries, time series or spectra for plotting elsewhere.

mod config;
mod orchestrator;
mod output;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use orchestrator::{Orchestrator, SeriesKind, SignalKind};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "recon-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Signal parameters shared by every command.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Path to a TOML or JSON lab configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tone frequency (Hz)
    #[arg(long)]
    signal_frequency: Option<f64>,

    /// ADC sampling frequency (Hz)
    #[arg(long)]
    sampling_frequency: Option<f64>,

    /// Observation window (s)
    #[arg(long)]
    duration: Option<f64>,

    /// Density of the simulated analog signal (Hz)
    #[arg(long)]
    analog_resolution: Option<f64>,
}

impl ParamArgs {
    /// Load the config file (or defaults), apply flag overrides and validate.
    fn resolve(&self) -> Result<config::LabConfig> {
        let mut lab = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {:?}", path);
                config::load_config(path)?
            }
            None => config::LabConfig::default(),
        };

        let signal = &mut lab.signal;
        if let Some(f) = self.signal_frequency {
            signal.signal_frequency = f;
        }
        if let Some(fs) = self.sampling_frequency {
            signal.sampling_frequency = fs;
        }
        if let Some(d) = self.duration {
            signal.duration = d;
        }
        if let Some(r) = self.analog_resolution {
            signal.analog_resolution = r;
        }

        config::validate_config(&lab)?;
        Ok(lab)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print a summary
    Analyze {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Print one time series
    Series {
        /// Which series to print
        #[arg(value_enum)]
        kind: SeriesKind,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Print the power spectral density of one signal
    Spectrum {
        /// Which signal to analyze
        #[arg(value_enum)]
        kind: SignalKind,

        #[command(flatten)]
        params: ParamArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Analyze { params } => {
            let orchestrator = Orchestrator::new(params.resolve()?)?;
            let results = orchestrator.run()?;
            output::write_summary(&mut out, &results, cli.format)?;
        }
        Commands::Series { kind, params } => {
            let orchestrator = Orchestrator::new(params.resolve()?)?;
            let waveform = orchestrator.series(kind)?;
            output::write_series(&mut out, kind.label(), &waveform, cli.format)?;
        }
        Commands::Spectrum { kind, params } => {
            let orchestrator = Orchestrator::new(params.resolve()?)?;
            tracing::info!(
                "Estimating PSD of {} at {} Hz",
                kind.label(),
                orchestrator.engine().config().analog_resolution.0
            );
            let spectrum = orchestrator.spectrum(kind)?;
            output::write_spectrum(&mut out, kind.label(), &spectrum, cli.format)?;
        }
    }

    Ok(())
}
