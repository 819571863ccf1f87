use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::color::generate_palette;
use crate::config::Settings;
use crate::data::align::sum_weighted;
use crate::data::loader;
use crate::data::model::{CompositeCurve, LoadedSpectrum, WeightedCurve};
use crate::report::{self, SpectrumReport};

use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One row in the spectra list: loaded data plus the multiplier edit buffer.
pub struct SpectrumEntry {
    pub spectrum: LoadedSpectrum,
    /// Text in the multiplier field; committed on Enter / focus loss.
    pub multiplier_text: String,
}

impl SpectrumEntry {
    fn new(spectrum: LoadedSpectrum) -> Self {
        let multiplier_text = format_multiplier(spectrum.weighted.multiplier());
        Self {
            spectrum,
            multiplier_text,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded spectra in load order.
    pub entries: Vec<SpectrumEntry>,

    /// Line colours, one per entry.
    pub palette: Vec<Color32>,

    /// Sum of all weighted spectra (rebuilt on every change).
    pub composite: CompositeCurve,

    /// Metrics for `composite`.
    pub report: SpectrumReport,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let mut state = Self {
            settings,
            entries: Vec::new(),
            palette: Vec::new(),
            composite: CompositeCurve::default(),
            report: SpectrumReport::default(),
            status_message: None,
        };
        state.recompute();
        state
    }

    /// Load files and add them to the session, respecting `max_spectra`.
    ///
    /// Each failure is logged and reported in the status line; successfully
    /// loaded files are kept.
    pub fn load_paths(&mut self, paths: &[PathBuf]) {
        let mut errors = Vec::new();
        for path in paths {
            if self.entries.len() >= self.settings.max_spectra {
                errors.push(format!(
                    "limit of {} spectra reached, skipped {}",
                    self.settings.max_spectra,
                    path.display()
                ));
                break;
            }
            match loader::load_file(path) {
                Ok(curve) => {
                    self.entries.push(SpectrumEntry::new(LoadedSpectrum::new(
                        path.clone(),
                        curve,
                    )));
                }
                Err(e) => {
                    log::error!("Failed to load file: {e:#}");
                    errors.push(format!("{e:#}"));
                }
            }
        }
        self.status_message = (!errors.is_empty()).then(|| format!("Error: {}", errors.join("; ")));
        self.recompute();
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            let removed = self.entries.remove(index);
            log::info!("Removed {}", removed.spectrum.name);
            self.recompute();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.status_message = None;
        self.recompute();
    }

    /// Parse and apply the multiplier text of entry `index`.
    ///
    /// Invalid input restores the previous value in the text field.
    pub fn commit_multiplier(&mut self, index: usize) {
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        let parsed = entry.multiplier_text.trim().parse::<f64>();
        let result = match parsed {
            Ok(m) => entry
                .spectrum
                .weighted
                .set_multiplier(m)
                .map_err(|e| e.to_string()),
            Err(_) => Err(format!(
                "'{}' is not a number",
                entry.multiplier_text.trim()
            )),
        };
        match result {
            Ok(()) => {
                self.status_message = None;
            }
            Err(msg) => {
                log::warn!("Rejected multiplier for {}: {msg}", entry.spectrum.name);
                self.status_message = Some(format!("{}: {msg}", entry.spectrum.name));
            }
        }
        entry.multiplier_text = format_multiplier(entry.spectrum.weighted.multiplier());
        self.recompute();
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.recompute();
    }

    /// Rebuild composite, metrics and colours from scratch.
    pub fn recompute(&mut self) {
        let weighted: Vec<&WeightedCurve> =
            self.entries.iter().map(|e| &e.spectrum.weighted).collect();
        self.composite = sum_weighted(&weighted);
        self.report = SpectrumReport::compute(&self.composite, &self.settings);
        self.palette = generate_palette(self.entries.len());
        log::debug!(
            "Recomputed composite of {} spectra: total PPF {:.4}",
            self.entries.len(),
            self.report.ppf.total
        );
    }

    /// Write the per-wavelength PPF table of the composite.
    pub fn export_ppf(&self, path: &Path) -> Result<()> {
        if self.composite.curve.is_empty() {
            bail!("no composite spectrum to export");
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_ppf_csv(&self.composite.curve, file).context("writing PPF table")?;
        log::info!("Exported PPF table to {}", path.display());
        Ok(())
    }

    /// Write the composite spectrum as `wavelength,intensity`.
    pub fn export_composite(&self, path: &Path) -> Result<()> {
        if self.composite.curve.is_empty() {
            bail!("no composite spectrum to export");
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_curve_csv(&self.composite.curve, file).context("writing composite")?;
        log::info!("Exported composite spectrum to {}", path.display());
        Ok(())
    }
}

fn format_multiplier(m: f64) -> String {
    format!("{m}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{SpectralCurve, SpectralSample};
    use approx::assert_relative_eq;

    fn entry(name: &str, points: &[(f64, f64)]) -> SpectrumEntry {
        let curve = SpectralCurve::from_samples(
            points.iter().copied().map(SpectralSample::from).collect(),
        );
        SpectrumEntry::new(LoadedSpectrum::new(PathBuf::from(name), curve))
    }

    fn state_with_two() -> AppState {
        let mut state = AppState::default();
        state.entries.push(entry("a.csv", &[(400.0, 1.0), (500.0, 1.0)]));
        state.entries.push(entry("b.csv", &[(400.0, 2.0), (500.0, 2.0)]));
        state.recompute();
        state
    }

    #[test]
    fn recompute_sums_entries() {
        let state = state_with_two();
        let y: Vec<f64> = state.composite.curve.intensities().collect();
        assert_eq!(y, vec![3.0, 3.0]);
        assert_eq!(state.palette.len(), 2);
        assert_eq!(state.report.spectra, 2);
    }

    #[test]
    fn multiplier_commit_updates_metrics() {
        let mut state = state_with_two();
        let before = state.report.ppf.total;
        state.entries[1].multiplier_text = "0.5".into();
        state.commit_multiplier(1);
        assert_eq!(state.entries[1].spectrum.weighted.multiplier(), 0.5);
        assert!(state.status_message.is_none());
        // composite 1+1 = 2 per sample instead of 3
        assert_relative_eq!(state.report.ppf.total, before * 2.0 / 3.0);
    }

    #[test]
    fn invalid_multiplier_is_rejected_and_restored() {
        let mut state = state_with_two();
        state.entries[0].multiplier_text = "abc".into();
        state.commit_multiplier(0);
        assert!(state.status_message.as_deref().unwrap().contains("not a number"));
        assert_eq!(state.entries[0].multiplier_text, "1");

        state.entries[0].multiplier_text = "-2".into();
        state.commit_multiplier(0);
        assert!(state.status_message.is_some());
        assert_eq!(state.entries[0].spectrum.weighted.multiplier(), 1.0);
    }

    #[test]
    fn remove_and_clear() {
        let mut state = state_with_two();
        state.remove(0);
        assert_eq!(state.entries.len(), 1);
        state.remove(5);
        assert_eq!(state.entries.len(), 1);
        state.clear();
        assert!(state.composite.curve.is_empty());
        assert_eq!(state.report.ppf.total, 0.0);
    }

    #[test]
    fn load_failure_is_reported() {
        let mut state = AppState::default();
        state.load_paths(&[PathBuf::from("/definitely/missing/spectrum.csv")]);
        assert!(state.entries.is_empty());
        assert!(state.status_message.unwrap().starts_with("Error:"));
    }

    #[test]
    fn max_spectra_is_enforced() {
        let mut state = AppState::new(Settings {
            max_spectra: 0,
            ..Settings::default()
        });
        state.load_paths(&[PathBuf::from("x.csv")]);
        assert!(state.status_message.unwrap().contains("limit of 0"));
    }

    #[test]
    fn export_requires_data() {
        let state = AppState::default();
        assert!(state.export_ppf(Path::new("unused.csv")).is_err());
    }
}
