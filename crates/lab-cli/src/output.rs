//! Result output formatting.
//!
//! Everything goes to a caller-supplied writer (stdout in the binary); the lab
//! does not keep results between runs.

use crate::orchestrator::LabResults;
use crate::OutputFormat;
use anyhow::Result;
use lib_dsp::spectral::DecibelSpectrum;
use lib_types::waveform::Waveform;
use std::io::Write;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v))
}

/// Write the run summary.
pub fn write_summary<W: Write>(out: &mut W, results: &LabResults, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Signal Reconstruction Summary: {}", results.name)?;
            writeln!(out, "==============================")?;
            let nyq = &results.nyquist;
            if nyq.satisfied {
                writeln!(
                    out,
                    "Nyquist:        SATISFIED (Fs {} Hz >= 2 * f = {} Hz)",
                    nyq.sampling_frequency, nyq.nyquist_rate
                )?;
            } else {
                writeln!(
                    out,
                    "Nyquist:        ALIASING (Fs {} Hz < 2 * f = {} Hz)",
                    nyq.sampling_frequency, nyq.nyquist_rate
                )?;
            }
            writeln!(out, "Analog points:  {}", results.analog_points)?;
            writeln!(out, "Samples:        {}", results.sample_count)?;
            writeln!(out)?;
            writeln!(
                out,
                "{:<14} {:>9} {:>9} {:>10} {:>12} {:>10} {:>11} {:>11} {:>12}",
                "signal", "rms", "pk_pk", "mae", "interior", "max_err", "peak_hz", "peak_db", "image_power"
            )?;
            for s in &results.signals {
                writeln!(
                    out,
                    "{:<14} {:>9.4} {:>9.4} {:>10} {:>12} {:>10} {:>11.2} {:>11.2} {:>12.3e}",
                    s.label,
                    s.rms,
                    s.peak_to_peak,
                    fmt_opt(s.mean_abs_error),
                    fmt_opt(s.interior_mean_abs_error),
                    fmt_opt(s.max_abs_error),
                    s.psd_peak_hz,
                    s.psd_peak_db,
                    s.image_power
                )?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(results)?)?;
        }
        OutputFormat::Csv => {
            writeln!(
                out,
                "signal,rms,peak_to_peak,mean_abs_error,interior_mean_abs_error,max_abs_error,psd_peak_hz,psd_peak_db,image_power"
            )?;
            for s in &results.signals {
                let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
                writeln!(
                    out,
                    "{},{},{},{},{},{},{},{},{}",
                    s.label,
                    s.rms,
                    s.peak_to_peak,
                    opt(s.mean_abs_error),
                    opt(s.interior_mean_abs_error),
                    opt(s.max_abs_error),
                    s.psd_peak_hz,
                    s.psd_peak_db,
                    s.image_power
                )?;
            }
        }
    }

    Ok(())
}

/// Write one time series.
pub fn write_series<W: Write>(
    out: &mut W,
    label: &str,
    waveform: &Waveform,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "{} ({} points at {:.3} Hz, spanning {:.6} s)",
                label,
                waveform.len(),
                waveform.sample_rate(),
                waveform.duration().0
            )?;
            for (t, v) in waveform.points() {
                writeln!(out, "{:>12.6} {:>12.6}", t.0, v)?;
            }
        }
        OutputFormat::Json => {
            let times: Vec<f64> = waveform.points().map(|(t, _)| t.0).collect();
            let json = serde_json::json!({
                "series": label,
                "dt": waveform.dt.0,
                "time": times,
                "value": waveform.samples,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "time,value")?;
            for (t, v) in waveform.points() {
                writeln!(out, "{},{}", t.0, v)?;
            }
        }
    }

    tracing::debug!("Wrote {} points of {}", waveform.len(), label);
    Ok(())
}

/// Write one decibel spectrum.
pub fn write_spectrum<W: Write>(
    out: &mut W,
    label: &str,
    spectrum: &DecibelSpectrum,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{} PSD ({} bins)", label, spectrum.len())?;
            if let Some((f, db)) = spectrum.peak() {
                writeln!(out, "peak: {:.2} dB at {:.2} Hz", db, f)?;
            }
            for (f, db) in spectrum.frequencies.iter().zip(spectrum.power_db.iter()) {
                writeln!(out, "{:>10.3} {:>10.3}", f, db)?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "spectrum": label,
                "frequency_hz": spectrum.frequencies,
                "power_db": spectrum.power_db,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
        }
        OutputFormat::Csv => {
            writeln!(out, "frequency_hz,power_db")?;
            for (f, db) in spectrum.frequencies.iter().zip(spectrum.power_db.iter()) {
                writeln!(out, "{},{}", f, db)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabConfig;
    use crate::orchestrator::Orchestrator;
    use lib_types::units::Seconds;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_series_csv() {
        let wf = Waveform::new(vec![0.0, 1.0, 0.0], Seconds(0.25), Seconds::ZERO);
        let text = render(|out| write_series(out, "samples", &wf, OutputFormat::Csv));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines, vec!["time,value", "0,0", "0.25,1", "0.5,0"]);
    }

    #[test]
    fn test_series_text_header() {
        let wf = Waveform::new(vec![0.0; 13], Seconds(0.04), Seconds::ZERO);
        let text = render(|out| write_series(out, "samples", &wf, OutputFormat::Text));

        let header = text.lines().next().unwrap();
        assert_eq!(header, "samples (13 points at 25.000 Hz, spanning 0.520000 s)");
        assert_eq!(text.lines().count(), 14);
    }

    #[test]
    fn test_spectrum_json() {
        let spectrum = DecibelSpectrum {
            frequencies: vec![0.0, 2.0],
            power_db: vec![-120.0, -9.5],
        };
        let text = render(|out| write_spectrum(out, "zoh", &spectrum, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["spectrum"], "zoh");
        assert_eq!(value["frequency_hz"][1], 2.0);
        assert_eq!(value["power_db"][0], -120.0);
    }

    #[test]
    fn test_summary_formats() {
        let results = Orchestrator::new(LabConfig::default()).unwrap().run().unwrap();

        let text = render(|out| write_summary(out, &results, OutputFormat::Text));
        assert!(text.contains("SATISFIED"));
        assert!(text.contains("sinc"));
        assert!(text.contains("pk_pk"));

        let csv = render(|out| write_summary(out, &results, OutputFormat::Csv));
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().nth(1).unwrap().starts_with("ground_truth,"));

        let json = render(|out| write_summary(out, &results, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["sample_count"], 13);
        assert_eq!(value["nyquist"]["satisfied"], true);
        assert!(value["signals"][0]["mean_abs_error"].is_null());
        assert!(value["signals"][0]["peak_to_peak"].as_f64().unwrap() > 1.9);
    }
}
