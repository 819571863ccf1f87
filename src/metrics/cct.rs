use serde::Serialize;

use crate::data::model::SpectralCurve;

/// CIE 1931 2° standard observer, 10 nm steps from 400 to 700 nm:
/// `(wavelength, x̄, ȳ, z̄)`.
pub const CIE_1931_CMF: [(f64, f64, f64, f64); 31] = [
    (400.0, 0.014_31, 0.000_396, 0.067_85),
    (410.0, 0.043_51, 0.001_210, 0.207_40),
    (420.0, 0.134_38, 0.004_000, 0.645_60),
    (430.0, 0.283_90, 0.011_600, 1.385_60),
    (440.0, 0.348_28, 0.023_000, 1.747_06),
    (450.0, 0.336_20, 0.038_000, 1.772_11),
    (460.0, 0.290_80, 0.060_000, 1.669_20),
    (470.0, 0.195_36, 0.090_980, 1.287_64),
    (480.0, 0.095_64, 0.139_020, 0.812_95),
    (490.0, 0.032_01, 0.208_020, 0.465_18),
    (500.0, 0.004_90, 0.323_000, 0.272_00),
    (510.0, 0.009_30, 0.503_000, 0.158_20),
    (520.0, 0.063_27, 0.710_000, 0.078_25),
    (530.0, 0.165_50, 0.862_000, 0.042_16),
    (540.0, 0.290_40, 0.954_000, 0.020_30),
    (550.0, 0.433_45, 0.994_95, 0.008_75),
    (560.0, 0.594_50, 0.995_000, 0.003_90),
    (570.0, 0.762_10, 0.952_000, 0.002_10),
    (580.0, 0.916_30, 0.870_000, 0.001_65),
    (590.0, 1.026_30, 0.757_000, 0.001_10),
    (600.0, 1.062_20, 0.631_000, 0.000_80),
    (610.0, 1.002_60, 0.503_000, 0.000_34),
    (620.0, 0.854_45, 0.381_000, 0.000_19),
    (630.0, 0.642_40, 0.265_000, 0.000_05),
    (640.0, 0.447_90, 0.175_000, 0.000_02),
    (650.0, 0.283_50, 0.107_000, 0.0),
    (660.0, 0.164_90, 0.061_000, 0.0),
    (670.0, 0.087_40, 0.032_000, 0.0),
    (680.0, 0.046_77, 0.017_000, 0.0),
    (690.0, 0.022_70, 0.008_210, 0.0),
    (700.0, 0.011_36, 0.004_102, 0.0),
];

/// Colour-matching-weighted sums of a spectrum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tristimulus {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Tristimulus {
    /// CIE xy chromaticity, or `None` when X+Y+Z is zero or not finite.
    pub fn chromaticity(&self) -> Option<(f64, f64)> {
        let sum = self.x + self.y + self.z;
        if sum == 0.0 || !sum.is_finite() {
            return None;
        }
        Some((self.x / sum, self.y / sum))
    }
}

/// Discrete sum over the 10 nm table grid of `intensity(w) * cmf(w)`.
///
/// The curve is linearly interpolated onto the grid and counts as 0 outside
/// its coverage.
pub fn tristimulus(curve: &SpectralCurve) -> Tristimulus {
    CIE_1931_CMF
        .iter()
        .fold(Tristimulus::default(), |acc, &(w, xb, yb, zb)| {
            let e = curve.intensity_at(w);
            Tristimulus {
                x: acc.x + e * xb,
                y: acc.y + e * yb,
                z: acc.z + e * zb,
            }
        })
}

/// McCamy's cubic approximation from xy chromaticity.
pub fn mccamy_cct(x: f64, y: f64) -> f64 {
    let n = (x - 0.3320) / (y - 0.1858);
    -449.0 * n.powi(3) + 3525.0 * n.powi(2) - 6823.3 * n + 5520.33
}

/// Approximate correlated colour temperature in Kelvin.
///
/// Returns `0.0` when the spectrum carries no tristimulus signal or the
/// result is not finite. Never panics.
pub fn compute_cct(curve: &SpectralCurve) -> f64 {
    let Some((x, y)) = tristimulus(curve).chromaticity() else {
        return 0.0;
    };
    let cct = mccamy_cct(x, y);
    if cct.is_finite() {
        cct
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SpectralSample;
    use approx::assert_relative_eq;

    fn flat(from: f64, to: f64, step: f64, value: f64) -> SpectralCurve {
        let n = ((to - from) / step).round() as usize;
        SpectralCurve::from_samples(
            (0..=n)
                .map(|i| SpectralSample::new(from + i as f64 * step, value))
                .collect(),
        )
    }

    #[test]
    fn mccamy_reference_illuminants() {
        // D65 and illuminant A chromaticities
        assert_relative_eq!(mccamy_cct(0.3127, 0.3290), 6505.0, epsilon = 5.0);
        assert_relative_eq!(mccamy_cct(0.44757, 0.40745), 2857.0, epsilon = 5.0);
    }

    #[test]
    fn zero_spectrum_gives_sentinel() {
        assert_eq!(compute_cct(&flat(400.0, 700.0, 1.0, 0.0)), 0.0);
        assert_eq!(compute_cct(&SpectralCurve::default()), 0.0);
    }

    #[test]
    fn scale_invariant() {
        let base = SpectralCurve::from_samples(
            (400..=700)
                .map(|w| {
                    let w = w as f64;
                    SpectralSample::new(w, 1.0 + (w - 400.0) / 300.0)
                })
                .collect(),
        );
        let a = compute_cct(&base);
        let b = compute_cct(&base.scaled(37.5));
        assert!(a > 0.0);
        assert_relative_eq!(a, b, max_relative = 1e-9);
    }

    #[test]
    fn blue_heavy_spectrum_is_cooler_than_red_heavy() {
        let blue = SpectralCurve::from_samples(
            (400..=700)
                .map(|w| SpectralSample::new(w as f64, (700 - w) as f64 + 10.0))
                .collect(),
        );
        let red = SpectralCurve::from_samples(
            (400..=700)
                .map(|w| SpectralSample::new(w as f64, (w - 400) as f64 + 10.0))
                .collect(),
        );
        assert!(compute_cct(&blue) > compute_cct(&red));
    }

    #[test]
    fn flat_spectrum_is_near_equal_energy() {
        let t = tristimulus(&flat(400.0, 700.0, 10.0, 1.0));
        let (x, y) = t.chromaticity().unwrap();
        assert!((0.30..0.36).contains(&x), "x = {x}");
        assert!((0.30..0.36).contains(&y), "y = {y}");
    }

    #[test]
    fn chromaticity_none_for_zero_sum() {
        assert_eq!(Tristimulus::default().chromaticity(), None);
    }
}
