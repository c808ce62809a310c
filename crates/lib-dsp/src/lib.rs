//! # lib-dsp
//!
//! Sampling and reconstruction engine for the signal reconstruction lab.
//!
//! This crate provides the mathematical core:
//!
//! - **Engine**: ground-truth tone, ideal ADC samples and both reconstructions
//!   over fixed time axes
//! - **Reconstruction**: zero-order hold and Whittaker-Shannon sinc kernels
//! - **Spectral**: Welch power spectral density estimation
//! - **FFT / Windows**: real-input transforms and tapering windows
//! - **Metrics**: reconstruction error against the ground truth

pub mod error;
pub mod fft;
pub mod window;
pub mod reconstruction;
pub mod spectral;
pub mod metrics;
pub mod engine;

pub use error::{DspError, DspResult};
pub use fft::FftEngine;
pub use engine::{EngineConfig, ReconstructionEngine, DEFAULT_ANALOG_RESOLUTION, MAX_AXIS_LEN};
pub use spectral::{DecibelSpectrum, Psd, WelchConfig};
