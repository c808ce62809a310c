//! # lib-types
//!
//! Core type definitions for the signal reconstruction lab.
//!
//! This crate provides foundational types used throughout the workspace:
//! - Physical units with compile-time safety
//! - Waveform representation for uniformly sampled time-domain signals

pub mod units;
pub mod waveform;

pub use units::*;
pub use waveform::*;
