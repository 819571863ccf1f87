//! Tunable settings for the viewer and the report tool.
//!
//! Settings are plain JSON; every field has a default so a partial file (or
//! `{}`) is valid:
//!
//! ```json
//! {
//!   "band_set": "six",
//!   "integration": "riemann",
//!   "show_cct": true,
//!   "max_spectra": 10,
//!   "normalize_each": false
//! }
//! ```
//!
//! `band_set` may also be an explicit list:
//! `{"custom": [{"name": "blue", "lo": 400, "hi": 500}]}`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::{BandDefinition, BandSet, IntegrationMethod};

/// Environment variable naming a settings file for the GUI.
pub const CONFIG_ENV: &str = "SPECTRAL_PPF_CONFIG";

/// Which PPF bands to report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandPreset {
    #[default]
    Three,
    Six,
    Custom(Vec<BandDefinition>),
}

impl BandPreset {
    pub fn resolve(&self) -> Result<BandSet, ConfigError> {
        Ok(match self {
            BandPreset::Three => BandSet::three_band(),
            BandPreset::Six => BandSet::six_band(),
            BandPreset::Custom(bands) => BandSet::custom(bands.clone())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub band_set: BandPreset,
    pub integration: IntegrationMethod,
    /// Compute and display the McCamy CCT estimate.
    pub show_cct: bool,
    /// Upper limit on simultaneously loaded spectra.
    pub max_spectra: usize,
    /// Peak-normalise each input curve in the per-spectrum plot.
    pub normalize_each: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            band_set: BandPreset::Three,
            integration: IntegrationMethod::Riemann,
            show_cct: true,
            max_spectra: 10,
            normalize_each: false,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        // Catch bad custom bands at load time, not at first recompute.
        settings.band_set.resolve()?;
        Ok(settings)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings from [`CONFIG_ENV`] if set, otherwise defaults.
    ///
    /// A broken file is logged and ignored so the viewer still starts.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_json_file(Path::new(&path)) {
            Ok(settings) => {
                log::info!("Using settings from {}", Path::new(&path).display());
                settings
            }
            Err(e) => {
                log::error!("Ignoring settings file: {:#}", anyhow::Error::from(e));
                Self::default()
            }
        }
    }

    /// Resolved band set; falls back to three bands if the preset is invalid.
    pub fn bands(&self) -> BandSet {
        self.band_set.resolve().unwrap_or_else(|e| {
            log::warn!("Invalid band set ({e}), using three-band default");
            BandSet::three_band()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn presets_and_method_parse() {
        let s: Settings =
            serde_json::from_str(r#"{"band_set": "six", "integration": "trapezoidal"}"#).unwrap();
        assert_eq!(s.band_set, BandPreset::Six);
        assert_eq!(s.integration, IntegrationMethod::Trapezoidal);
        assert_eq!(s.bands().bands().len(), 6);
    }

    #[test]
    fn custom_bands_parse() {
        let s: Settings = serde_json::from_str(
            r#"{"band_set": {"custom": [
                {"name": "far-blue", "lo": 400, "hi": 450},
                {"name": "deep-red", "lo": 640, "hi": 700}
            ]}}"#,
        )
        .unwrap();
        let bands = s.bands();
        assert_eq!(bands.bands()[1].name, "deep-red");
    }

    #[test]
    fn invalid_custom_bands_fall_back() {
        let s = Settings {
            band_set: BandPreset::Custom(vec![BandDefinition::new("uv", 300.0, 380.0)]),
            ..Settings::default()
        };
        assert!(s.band_set.resolve().is_err());
        assert_eq!(s.bands(), BandSet::three_band());
    }

    #[test]
    fn file_round_trip_and_missing_file() {
        let path = std::env::temp_dir().join(format!(
            "spectral-ppf-settings-{}.json",
            std::process::id()
        ));
        let s = Settings {
            band_set: BandPreset::Six,
            show_cct: false,
            ..Settings::default()
        };
        s.to_json_file(&path).unwrap();
        assert_eq!(Settings::from_json_file(&path).unwrap(), s);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            Settings::from_json_file(&path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn save_failures_are_not_reported_as_parse_errors() {
        let dir = std::env::temp_dir().join(format!(
            "spectral-ppf-missing-dir-{}",
            std::process::id()
        ));
        let err = Settings::default()
            .to_json_file(&dir.join("settings.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }), "{err:?}");
        assert!(err.to_string().starts_with("writing config"));

        let source = serde_json::from_str::<Settings>("[").unwrap_err();
        let err = ConfigError::Serialize {
            path: "settings.json".into(),
            source,
        };
        assert_eq!(err.to_string(), "serializing config settings.json");
    }
}
