use std::io::Write;

use serde::Serialize;

use crate::config::Settings;
use crate::data::model::{CompositeCurve, SpectralCurve};
use crate::metrics::{compute_cct, compute_ppf_with, ppf_per_sample, PpfResult};

// ---------------------------------------------------------------------------
// Metrics summary for one composite
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpectrumReport {
    /// Number of input spectra summed into the composite.
    pub spectra: usize,
    /// Number of composite samples.
    pub samples: usize,
    pub range: Option<(f64, f64)>,
    /// Input grids differed and were interpolated.
    pub interpolated: bool,
    pub ppf: PpfResult,
    /// `None` when disabled in settings; `Some(0.0)` is the degenerate sentinel.
    pub cct: Option<f64>,
}

impl SpectrumReport {
    /// Full recompute of every metric for `composite`.
    pub fn compute(composite: &CompositeCurve, settings: &Settings) -> Self {
        let curve = &composite.curve;
        let ppf = compute_ppf_with(curve, &settings.bands(), settings.integration);
        let cct = settings.show_cct.then(|| compute_cct(curve));
        Self {
            spectra: composite.contributors,
            samples: curve.len(),
            range: curve.range(),
            interpolated: composite.interpolated,
            ppf,
            cct,
        }
    }

    /// `(label, value)` rows for display: total first, then each band.
    pub fn ppf_rows(&self) -> Vec<(String, String)> {
        std::iter::once(("Total PPF (400-700 nm)".to_string(), format_ppf(self.ppf.total)))
            .chain(
                self.ppf
                    .bands
                    .iter()
                    .map(|(name, v)| (format!("{name} PPF"), format_ppf(*v))),
            )
            .collect()
    }

    /// Plain-text summary used by the CLI.
    pub fn to_text(&self) -> String {
        let mut out = format!("Spectra: {}  Samples: {}", self.spectra, self.samples);
        if let Some((lo, hi)) = self.range {
            out.push_str(&format!("  Range: {lo:.1}-{hi:.1} nm"));
        }
        if self.interpolated {
            out.push_str("  (interpolated onto common grid)");
        }
        out.push('\n');
        for (label, value) in self.ppf_rows() {
            out.push_str(&format!("{label:<24} {value}\n"));
        }
        if let Some(cct) = self.cct {
            out.push_str(&format!("{:<24} {}\n", "CCT", format_cct(cct)));
        }
        out
    }
}

/// Two-decimal PPF value.
pub fn format_ppf(value: f64) -> String {
    format!("{value:.2}")
}

/// Kelvin-suffixed CCT, or `N/A` for the degenerate sentinel.
pub fn format_cct(cct: f64) -> String {
    if cct > 0.0 && cct.is_finite() {
        format!("{cct:.0} K")
    } else {
        "N/A".to_string()
    }
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Per-wavelength PPF table: `Wavelength(nm),PPF(umol/s)`.
pub fn write_ppf_csv<W: Write>(curve: &SpectralCurve, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Wavelength(nm)", "PPF(umol/s)"])?;
    for (w, ppf) in ppf_per_sample(curve) {
        wtr.write_record([format!("{w}"), format!("{ppf:.4}")])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `wavelength,intensity` table readable by the loader.
pub fn write_curve_csv<W: Write>(curve: &SpectralCurve, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["wavelength", "intensity"])?;
    for s in curve.samples() {
        wtr.write_record([s.wavelength.to_string(), s.intensity.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::SpectralSample;

    fn composite() -> CompositeCurve {
        CompositeCurve {
            curve: SpectralCurve::from_samples(vec![
                SpectralSample::new(400.0, 10.0),
                SpectralSample::new(500.0, 10.0),
                SpectralSample::new(600.0, 10.0),
                SpectralSample::new(700.0, 10.0),
            ]),
            contributors: 1,
            interpolated: false,
        }
    }

    #[test]
    fn report_rows_format_two_decimals() {
        let r = SpectrumReport::compute(&composite(), &Settings::default());
        let rows = r.ppf_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].1, "0.18");
        assert_eq!(rows[1].0, "blue PPF");
        assert!(r.cct.is_some());
    }

    #[test]
    fn cct_can_be_disabled() {
        let settings = Settings {
            show_cct: false,
            ..Settings::default()
        };
        let r = SpectrumReport::compute(&composite(), &settings);
        assert_eq!(r.cct, None);
        assert!(!r.to_text().contains("CCT"));
    }

    #[test]
    fn empty_composite_reports_zeros() {
        let r = SpectrumReport::compute(&CompositeCurve::default(), &Settings::default());
        assert_eq!(r.ppf.total, 0.0);
        assert_eq!(r.cct, Some(0.0));
        assert_eq!(r.range, None);
        assert!(r.to_text().contains("N/A"));
    }

    #[test]
    fn cct_formatting() {
        assert_eq!(format_cct(6504.6), "6505 K");
        assert_eq!(format_cct(0.0), "N/A");
        assert_eq!(format_cct(f64::NAN), "N/A");
    }

    #[test]
    fn ppf_csv_layout() {
        let mut buf = Vec::new();
        write_ppf_csv(&composite().curve, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Wavelength(nm),PPF(umol/s)");
        assert_eq!(lines[1], "400,0.0334");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn curve_csv_reloads() {
        let curve = composite().curve;
        let mut buf = Vec::new();
        write_curve_csv(&curve, &mut buf).unwrap();
        let reloaded = parse_csv(buf.as_slice()).unwrap();
        assert_eq!(reloaded, curve);
    }
}
