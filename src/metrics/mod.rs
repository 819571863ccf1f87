//! Spectral metrics: band-integrated PPF and an approximate CCT.
//!
//! Everything here is a pure function of its input curve. Degenerate input
//! produces zeros (or the `0.0` CCT sentinel) rather than errors, so callers
//! can always render a value.

pub mod cct;
pub mod ppf;

pub use cct::{compute_cct, mccamy_cct, tristimulus, Tristimulus};
pub use ppf::{
    compute_ppf, compute_ppf_with, ppf_per_sample, BandDefinition, BandSet, IntegrationMethod,
    PpfResult, PAR_RANGE, PPF_FACTOR,
};
