//! Spectral PPF calculator.
//!
//! Loads sampled spectra (`wavelength,intensity` or `nm,mw` files), sums them
//! with per-spectrum multipliers on a common wavelength grid, and derives
//! photosynthetic photon flux per band plus an approximate correlated colour
//! temperature. The [`metrics`] module is the pure numeric core; [`app`] and
//! [`ui`] are the egui viewer on top of it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod report;
pub mod state;
pub mod ui;
