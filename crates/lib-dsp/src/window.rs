//! Windowing functions for spectral analysis.
//!
//! Tapering each segment before the FFT keeps the strong fundamental of the
//! test tone from leaking across the whole spectrum and hiding the weaker
//! spectral images a zero-order hold introduces.
//!
//! Two forms are provided:
//! - [`generate_window`]: symmetric, `w[0] == w[N-1]`, for filter design and plots
//! - [`generate_periodic_window`]: DFT-even, for segment-wise spectral estimation

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function types for spectral processing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WindowType {
    /// No windowing (rectangular window).
    Rectangular,

    /// Hann (raised cosine) window - good general purpose.
    Hann,

    /// Hamming window - slightly better sidelobe rejection than Hann.
    Hamming,

    /// Blackman window - excellent sidelobe rejection.
    Blackman,

    /// Kaiser-Bessel window with configurable beta parameter.
    Kaiser { beta: f64 },
}

impl Default for WindowType {
    fn default() -> Self {
        Self::Hann
    }
}

/// Compute the zeroth-order modified Bessel function of the first kind, I_0(x).
///
/// Uses the polynomial approximation for efficiency.
fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();

    if ax < 3.75 {
        let t = (x / 3.75).powi(2);
        1.0 + t * (3.5156229
            + t * (3.0899424
                + t * (1.2067492
                    + t * (0.2659732
                        + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537
                                        + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

/// Generate symmetric window coefficients for a given window type and length.
///
/// # Arguments
///
/// * `window_type` - Type of window function to generate
/// * `length` - Number of points in the window
///
/// # Returns
///
/// Vector of window coefficients, length `length`.
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    if length == 1 {
        return vec![1.0];
    }

    let n = length as f64;
    let mut window = Vec::with_capacity(length);

    match window_type {
        WindowType::Rectangular => {
            window.resize(length, 1.0);
        }

        WindowType::Hann => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(0.5 - 0.5 * (2.0 * PI * x).cos());
            }
        }

        WindowType::Hamming => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(0.54 - 0.46 * (2.0 * PI * x).cos());
            }
        }

        WindowType::Blackman => {
            for i in 0..length {
                let x = i as f64 / (n - 1.0);
                window.push(
                    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos(),
                );
            }
        }

        WindowType::Kaiser { beta } => {
            let denom = bessel_i0(beta);
            for i in 0..length {
                let x = 2.0 * i as f64 / (n - 1.0) - 1.0; // Range [-1, 1]
                let arg = beta * (1.0 - x * x).max(0.0).sqrt();
                window.push(bessel_i0(arg) / denom);
            }
        }
    }

    window
}

/// Generate periodic (DFT-even) window coefficients.
///
/// Equal to the symmetric window of length `length + 1` with its final point
/// dropped, so that a segment of `length` samples tiles without a doubled edge.
pub fn generate_periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    if length <= 1 {
        return generate_window(window_type, length);
    }

    let mut window = generate_window(window_type, length + 1);
    window.truncate(length);
    window
}

/// Sum of squared window coefficients (incoherent power gain).
pub fn window_energy(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bessel_i0() {
        // I_0(0) = 1
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-10);

        // I_0(1) ≈ 1.266
        assert!((bessel_i0(1.0) - 1.266).abs() < 0.001);

        // I_0(3) ≈ 4.881
        assert!((bessel_i0(3.0) - 4.881).abs() < 0.001);

        assert!((bessel_i0(-2.0) - bessel_i0(2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_rectangular_window() {
        let window = generate_window(WindowType::Rectangular, 10);
        assert_eq!(window.len(), 10);
        assert!(window.iter().all(|&w| (w - 1.0).abs() < 1e-10));
    }

    #[test]
    fn test_hann_window() {
        let window = generate_window(WindowType::Hann, 64);
        assert_eq!(window.len(), 64);

        // Symmetric Hann starts and ends at 0
        assert!(window[0].abs() < 1e-10);
        assert!(window[63].abs() < 1e-10);

        assert!(window[32] > 0.9);
    }

    #[test]
    fn test_periodic_hann_window() {
        let window = generate_periodic_window(WindowType::Hann, 8);
        assert_eq!(window.len(), 8);

        // w[i] = 0.5 - 0.5 cos(2 pi i / N)
        for (i, &w) in window.iter().enumerate() {
            let expected = 0.5 - 0.5 * (2.0 * PI * i as f64 / 8.0).cos();
            assert!((w - expected).abs() < 1e-12, "index {}: {} vs {}", i, w, expected);
        }

        // Peak lands exactly on N/2 and only the first point is zero
        assert!((window[4] - 1.0).abs() < 1e-12);
        assert!(window[7] > 0.1);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(generate_window(WindowType::Hann, 0).is_empty());
        assert_eq!(generate_window(WindowType::Blackman, 1), vec![1.0]);
        assert_eq!(generate_periodic_window(WindowType::Hann, 1), vec![1.0]);
    }

    #[test]
    fn test_kaiser_window() {
        let window = generate_window(WindowType::Kaiser { beta: 6.0 }, 65);
        assert_eq!(window.len(), 65);

        assert!((window[32] - 1.0).abs() < 0.01);
        assert!(window[0] < 0.1);

        for i in 0..32 {
            assert!(
                (window[i] - window[64 - i]).abs() < 1e-10,
                "Asymmetry at index {}: {} vs {}",
                i,
                window[i],
                window[64 - i]
            );
        }
    }

    #[test]
    fn test_window_energy() {
        let rect = generate_window(WindowType::Rectangular, 16);
        assert!((window_energy(&rect) - 16.0).abs() < 1e-12);

        // Periodic Hann energy is 3N/8
        let hann = generate_periodic_window(WindowType::Hann, 1024);
        assert!((window_energy(&hann) - 384.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_type_from_json() {
        let hann: WindowType = serde_json::from_str(r#"{"type":"hann"}"#).unwrap();
        assert_eq!(hann, WindowType::Hann);

        let kaiser: WindowType = serde_json::from_str(r#"{"type":"kaiser","beta":8.6}"#).unwrap();
        assert!(matches!(kaiser, WindowType::Kaiser { beta } if (beta - 8.6).abs() < 1e-12));
    }
}
