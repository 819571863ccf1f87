use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Typed errors for the data and configuration layers
// ---------------------------------------------------------------------------

/// Problems building or re-weighting a [`crate::data::model::SpectralCurve`].
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("wavelength array has {wavelengths} values but intensity array has {intensities}")]
    LengthMismatch {
        wavelengths: usize,
        intensities: usize,
    },

    #[error("multiplier must be a positive finite number, got {0}")]
    InvalidMultiplier(f64),
}

/// Problems parsing a spectrum file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("file is empty")]
    Empty,

    #[error("header must name 'wavelength,intensity' or 'nm,mw' columns, found {found:?}")]
    MissingColumns { found: Vec<String> },

    #[error("no numeric rows found ({dropped} rows dropped)")]
    NoSamples { dropped: usize },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A custom band list that cannot be used for bucketing.
#[derive(Debug, Error, PartialEq)]
pub enum BandError {
    #[error("band list is empty")]
    Empty,

    #[error("band '{name}' has lo {lo} >= hi {hi}")]
    Inverted { name: String, lo: f64, hi: f64 },

    #[error("band '{name}' [{lo}, {hi}] lies outside 400-700 nm")]
    OutOfRange { name: String, lo: f64, hi: f64 },

    #[error("band '{name}' overlaps the previous band")]
    Overlap { name: String },
}

/// Loading or saving [`crate::config::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serializing config {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("writing config {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid band set in config")]
    Bands(#[from] BandError),
}
