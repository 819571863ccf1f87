use serde::{Deserialize, Serialize};

use crate::data::model::SpectralCurve;
use crate::error::BandError;

/// Empirical photon-flux conversion constant applied per sample (`w * y * K`).
pub const PPF_FACTOR: f64 = 0.008359 / 1000.0;

/// Photosynthetically active range, inclusive on both ends.
pub const PAR_RANGE: (f64, f64) = (400.0, 700.0);

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// A named wavelength interval `[lo, hi)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandDefinition {
    pub name: String,
    pub lo: f64,
    pub hi: f64,
}

impl BandDefinition {
    pub fn new(name: impl Into<String>, lo: f64, hi: f64) -> Self {
        Self {
            name: name.into(),
            lo,
            hi,
        }
    }

    /// Half-open membership, or closed when `closed_upper` (used for the last band).
    pub fn contains(&self, wavelength: f64, closed_upper: bool) -> bool {
        wavelength >= self.lo
            && (wavelength < self.hi || (closed_upper && wavelength == self.hi))
    }
}

/// Ordered, non-overlapping bands inside the PAR range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSet {
    bands: Vec<BandDefinition>,
}

impl Default for BandSet {
    fn default() -> Self {
        Self::three_band()
    }
}

impl BandSet {
    /// Blue / green / red, 100 nm each.
    pub fn three_band() -> Self {
        Self {
            bands: vec![
                BandDefinition::new("blue", 400.0, 500.0),
                BandDefinition::new("green", 500.0, 600.0),
                BandDefinition::new("red", 600.0, 700.0),
            ],
        }
    }

    /// Six colour bands split at 440, 490, 510, 580 and 645 nm.
    pub fn six_band() -> Self {
        Self {
            bands: vec![
                BandDefinition::new("violet_blue", 400.0, 440.0),
                BandDefinition::new("blue_cyan", 440.0, 490.0),
                BandDefinition::new("cyan_green", 490.0, 510.0),
                BandDefinition::new("green_yellow", 510.0, 580.0),
                BandDefinition::new("yellow_orange", 580.0, 645.0),
                BandDefinition::new("orange_red", 645.0, 700.0),
            ],
        }
    }

    /// Validate a user-supplied band list.
    ///
    /// Bands must be non-empty, ascending, non-overlapping and lie within
    /// 400-700 nm. Gaps between bands are allowed.
    pub fn custom(bands: Vec<BandDefinition>) -> Result<Self, BandError> {
        if bands.is_empty() {
            return Err(BandError::Empty);
        }
        let (par_lo, par_hi) = PAR_RANGE;
        let mut prev_hi = f64::NEG_INFINITY;
        for b in &bands {
            if !(b.lo < b.hi) {
                return Err(BandError::Inverted {
                    name: b.name.clone(),
                    lo: b.lo,
                    hi: b.hi,
                });
            }
            if b.lo < par_lo || b.hi > par_hi {
                return Err(BandError::OutOfRange {
                    name: b.name.clone(),
                    lo: b.lo,
                    hi: b.hi,
                });
            }
            if b.lo < prev_hi {
                return Err(BandError::Overlap {
                    name: b.name.clone(),
                });
            }
            prev_hi = b.hi;
        }
        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[BandDefinition] {
        &self.bands
    }

    /// Index of the band a wavelength falls into, if any.
    pub fn index_of(&self, wavelength: f64) -> Option<usize> {
        let last = self.bands.len().checked_sub(1)?;
        self.bands
            .iter()
            .enumerate()
            .position(|(i, b)| b.contains(wavelength, i == last))
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Total PPF over 400-700 nm plus per-band sums, in band order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PpfResult {
    pub total: f64,
    pub bands: Vec<(String, f64)>,
}

impl PpfResult {
    fn zeroed(bands: &BandSet) -> Self {
        Self {
            total: 0.0,
            bands: bands.bands().iter().map(|b| (b.name.clone(), 0.0)).collect(),
        }
    }

    /// Value for a named band.
    pub fn band(&self, name: &str) -> Option<f64> {
        self.bands.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn band_sum(&self) -> f64 {
        self.bands.iter().map(|(_, v)| v).sum()
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// How per-sample contributions are accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationMethod {
    /// Each sample contributes `w * y * K`, independent of spacing.
    #[default]
    Riemann,
    /// Trapezoid rule over `w * y * K` between consecutive samples of a region.
    Trapezoidal,
}

fn in_par(wavelength: f64) -> bool {
    wavelength >= PAR_RANGE.0 && wavelength <= PAR_RANGE.1
}

fn contribution(wavelength: f64, intensity: f64) -> f64 {
    wavelength * intensity * PPF_FACTOR
}

/// Per-sample PPF with the Riemann rule. Never fails; an empty curve yields zeros.
pub fn compute_ppf(curve: &SpectralCurve, bands: &BandSet) -> PpfResult {
    compute_ppf_with(curve, bands, IntegrationMethod::Riemann)
}

/// PPF with an explicit accumulation method.
pub fn compute_ppf_with(
    curve: &SpectralCurve,
    bands: &BandSet,
    method: IntegrationMethod,
) -> PpfResult {
    let mut result = PpfResult::zeroed(bands);
    match method {
        IntegrationMethod::Riemann => {
            for s in curve.samples() {
                if !in_par(s.wavelength) {
                    continue;
                }
                let c = contribution(s.wavelength, s.intensity);
                result.total += c;
                if let Some(idx) = bands.index_of(s.wavelength) {
                    result.bands[idx].1 += c;
                }
            }
        }
        IntegrationMethod::Trapezoidal => {
            result.total = trapezoid(curve, in_par);
            let last = bands.bands().len().saturating_sub(1);
            for (i, b) in bands.bands().iter().enumerate() {
                result.bands[i].1 = trapezoid(curve, |w| b.contains(w, i == last));
            }
        }
    }
    result
}

/// Trapezoid rule over runs of consecutive samples accepted by `keep`.
fn trapezoid(curve: &SpectralCurve, keep: impl Fn(f64) -> bool) -> f64 {
    curve
        .samples()
        .windows(2)
        .filter(|pair| keep(pair[0].wavelength) && keep(pair[1].wavelength))
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let fa = contribution(a.wavelength, a.intensity);
            let fb = contribution(b.wavelength, b.intensity);
            0.5 * (fa + fb) * (b.wavelength - a.wavelength)
        })
        .sum()
}

/// `(wavelength, ppf)` for every sample inside 400-700 nm.
pub fn ppf_per_sample(curve: &SpectralCurve) -> Vec<(f64, f64)> {
    curve
        .samples()
        .iter()
        .filter(|s| in_par(s.wavelength))
        .map(|s| (s.wavelength, contribution(s.wavelength, s.intensity)))
        .collect()
}
