use std::path::PathBuf;

use crate::error::CurveError;

// ---------------------------------------------------------------------------
// SpectralSample – one (wavelength, intensity) reading
// ---------------------------------------------------------------------------

/// A single reading: wavelength in nanometres, intensity in linear units (mW or relative).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    pub wavelength: f64,
    pub intensity: f64,
}

impl SpectralSample {
    pub fn new(wavelength: f64, intensity: f64) -> Self {
        Self {
            wavelength,
            intensity,
        }
    }
}

impl From<(f64, f64)> for SpectralSample {
    fn from((wavelength, intensity): (f64, f64)) -> Self {
        Self::new(wavelength, intensity)
    }
}

// ---------------------------------------------------------------------------
// SpectralCurve – ordered, unique-wavelength samples
// ---------------------------------------------------------------------------

/// Samples sorted strictly ascending by wavelength.
///
/// Every constructor enforces the ordering, so the metrics code can rely on it
/// without re-checking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralCurve {
    samples: Vec<SpectralSample>,
}

impl SpectralCurve {
    /// Build a curve from samples in any order.
    ///
    /// Non-finite samples are discarded; when two samples share a wavelength the
    /// first one encountered is kept.
    pub fn from_samples(samples: Vec<SpectralSample>) -> Self {
        let mut samples: Vec<SpectralSample> = samples
            .into_iter()
            .filter(|s| s.wavelength.is_finite() && s.intensity.is_finite())
            .collect();
        // Stable sort keeps the first duplicate in front.
        samples.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));
        samples.dedup_by(|later, earlier| later.wavelength == earlier.wavelength);
        Self { samples }
    }

    /// Build a curve from parallel wavelength / intensity arrays.
    pub fn from_arrays(wavelengths: &[f64], intensities: &[f64]) -> Result<Self, CurveError> {
        if wavelengths.len() != intensities.len() {
            return Err(CurveError::LengthMismatch {
                wavelengths: wavelengths.len(),
                intensities: intensities.len(),
            });
        }
        Ok(Self::from_samples(
            wavelengths
                .iter()
                .zip(intensities)
                .map(|(&w, &i)| SpectralSample::new(w, i))
                .collect(),
        ))
    }

    pub fn samples(&self) -> &[SpectralSample] {
        &self.samples
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.wavelength)
    }

    pub fn intensities(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.intensity)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last wavelength, if any.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.wavelength, self.samples.last()?.wavelength))
    }

    /// Largest intensity value (0 for an empty curve).
    pub fn peak(&self) -> f64 {
        self.intensities().fold(0.0, f64::max)
    }

    /// Whether any reading is negative (a data-quality flag, not an error).
    pub fn has_negative(&self) -> bool {
        self.intensities().any(|i| i < 0.0)
    }

    /// Linearly interpolated intensity at `wavelength`.
    ///
    /// Returns 0 outside the curve's coverage.
    pub fn intensity_at(&self, wavelength: f64) -> f64 {
        let s = &self.samples;
        let (Some(first), Some(last)) = (s.first(), s.last()) else {
            return 0.0;
        };
        if wavelength < first.wavelength || wavelength > last.wavelength {
            return 0.0;
        }
        // Index of the first sample with wavelength >= target.
        let hi = s.partition_point(|p| p.wavelength < wavelength);
        let upper = s[hi];
        if upper.wavelength == wavelength || hi == 0 {
            return upper.intensity;
        }
        let lower = s[hi - 1];
        let t = (wavelength - lower.wavelength) / (upper.wavelength - lower.wavelength);
        lower.intensity + t * (upper.intensity - lower.intensity)
    }

    /// Copy with every intensity multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            samples: self
                .samples
                .iter()
                .map(|s| SpectralSample::new(s.wavelength, s.intensity * factor))
                .collect(),
        }
    }

    /// Copy divided by its peak; an all-zero curve stays all-zero.
    pub fn normalized(&self) -> Self {
        let peak = self.peak();
        if peak > 0.0 {
            self.scaled(1.0 / peak)
        } else {
            self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// WeightedCurve – curve + user multiplier
// ---------------------------------------------------------------------------

/// A curve plus its relative contribution, applied when read.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCurve {
    curve: SpectralCurve,
    multiplier: f64,
}

impl WeightedCurve {
    pub fn new(curve: SpectralCurve) -> Self {
        Self {
            curve,
            multiplier: 1.0,
        }
    }

    pub fn with_multiplier(curve: SpectralCurve, multiplier: f64) -> Result<Self, CurveError> {
        let mut weighted = Self::new(curve);
        weighted.set_multiplier(multiplier)?;
        Ok(weighted)
    }

    pub fn curve(&self) -> &SpectralCurve {
        &self.curve
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Replace the multiplier. Rejects zero, negative and non-finite values.
    pub fn set_multiplier(&mut self, multiplier: f64) -> Result<(), CurveError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(CurveError::InvalidMultiplier(multiplier));
        }
        self.multiplier = multiplier;
        Ok(())
    }

    /// Multiplier-scaled samples.
    pub fn samples(&self) -> impl Iterator<Item = SpectralSample> + '_ {
        let m = self.multiplier;
        self.curve
            .samples()
            .iter()
            .map(move |s| SpectralSample::new(s.wavelength, s.intensity * m))
    }

    /// Multiplier-scaled intensity at `wavelength` (0 outside coverage).
    pub fn intensity_at(&self, wavelength: f64) -> f64 {
        self.curve.intensity_at(wavelength) * self.multiplier
    }

    /// Materialised scaled curve.
    pub fn effective(&self) -> SpectralCurve {
        self.curve.scaled(self.multiplier)
    }
}

// ---------------------------------------------------------------------------
// CompositeCurve – element-wise sum of weighted curves
// ---------------------------------------------------------------------------

/// The sum of several weighted curves on one wavelength grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeCurve {
    pub curve: SpectralCurve,
    /// Number of weighted curves that went into the sum.
    pub contributors: usize,
    /// True when input grids differed and values were interpolated onto the union grid.
    pub interpolated: bool,
}

// ---------------------------------------------------------------------------
// LoadedSpectrum – one file the user opened
// ---------------------------------------------------------------------------

/// A spectrum file loaded into the session.
#[derive(Debug, Clone)]
pub struct LoadedSpectrum {
    /// Display name (file name without directories).
    pub name: String,
    pub path: PathBuf,
    pub weighted: WeightedCurve,
}

impl LoadedSpectrum {
    pub fn new(path: PathBuf, curve: SpectralCurve) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            path,
            weighted: WeightedCurve::new(curve),
        }
    }
}
