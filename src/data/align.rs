use super::model::{CompositeCurve, SpectralCurve, SpectralSample, WeightedCurve};

// ---------------------------------------------------------------------------
// Grid alignment and summation
// ---------------------------------------------------------------------------

/// Whether two curves are sampled at exactly the same wavelengths.
pub fn same_grid(a: &SpectralCurve, b: &SpectralCurve) -> bool {
    a.len() == b.len() && a.wavelengths().zip(b.wavelengths()).all(|(x, y)| x == y)
}

/// Sorted union of every wavelength present in `curves`.
pub fn common_grid<'a>(curves: impl IntoIterator<Item = &'a SpectralCurve>) -> Vec<f64> {
    let mut grid: Vec<f64> = curves.into_iter().flat_map(|c| c.wavelengths()).collect();
    grid.sort_by(f64::total_cmp);
    grid.dedup();
    grid
}

/// Width of the wavelength bin each sample stands for.
///
/// Interior samples own half the gap to each neighbour; the two end samples
/// own the full gap to their single neighbour, so a uniform grid of `n`
/// samples spaced `d` apart gets `n` bins of width `d`.
pub fn bin_widths(wavelengths: &[f64]) -> Vec<f64> {
    let n = wavelengths.len();
    if n < 2 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| match i {
            0 => wavelengths[1] - wavelengths[0],
            i if i == n - 1 => wavelengths[i] - wavelengths[i - 1],
            i => 0.5 * (wavelengths[i + 1] - wavelengths[i - 1]),
        })
        .collect()
}

/// Resamples one weighted curve onto `grid` while keeping its per-sample sum.
///
/// Each reading is treated as the power in its own bin: the curve is turned
/// into power per nanometre, interpolated, and multiplied back by the grid's
/// bin widths. Resampling a curve onto its own grid returns it unchanged.
fn resample_onto(weighted: &WeightedCurve, grid: &[f64], grid_bins: &[f64]) -> Vec<f64> {
    let curve = weighted.curve();
    if curve.len() < 2 {
        // A lone reading has no bin width; it lands on its own grid point as-is.
        return grid.iter().map(|&wl| weighted.intensity_at(wl)).collect();
    }
    let wavelengths: Vec<f64> = curve.wavelengths().collect();
    let density = SpectralCurve::from_samples(
        weighted
            .samples()
            .zip(bin_widths(&wavelengths))
            .map(|(s, width)| SpectralSample::new(s.wavelength, s.intensity / width))
            .collect(),
    );
    grid.iter()
        .zip(grid_bins)
        .map(|(&wl, &width)| density.intensity_at(wl) * width)
        .collect()
}

/// Sum multiplier-scaled intensities of `curves` into one composite.
///
/// Identical grids are summed sample by sample. Otherwise each curve is
/// resampled onto the union grid with its per-sample sum preserved, so the
/// composite's PPF stays close to the sum of the inputs' PPF whatever their
/// sampling density. A curve contributes 0 outside its own range.
pub fn sum_weighted(curves: &[&WeightedCurve]) -> CompositeCurve {
    let Some((first, rest)) = curves.split_first() else {
        return CompositeCurve::default();
    };

    let aligned = rest.iter().all(|w| same_grid(first.curve(), w.curve()));

    let samples: Vec<SpectralSample> = if aligned {
        let mut sums: Vec<SpectralSample> = first.samples().collect();
        for w in rest {
            for (acc, s) in sums.iter_mut().zip(w.samples()) {
                acc.intensity += s.intensity;
            }
        }
        sums
    } else {
        let grid = common_grid(curves.iter().map(|w| w.curve()));
        let grid_bins = bin_widths(&grid);
        log::debug!(
            "Resampling {} spectra onto a common grid of {} points",
            curves.len(),
            grid.len()
        );
        let mut totals = vec![0.0; grid.len()];
        for w in curves {
            for (acc, v) in totals.iter_mut().zip(resample_onto(w, &grid, &grid_bins)) {
                *acc += v;
            }
        }
        grid.into_iter()
            .zip(totals)
            .map(|(wl, total)| SpectralSample::new(wl, total))
            .collect()
    };

    CompositeCurve {
        curve: SpectralCurve::from_samples(samples),
        contributors: curves.len(),
        interpolated: !aligned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weighted(points: &[(f64, f64)], multiplier: f64) -> WeightedCurve {
        let curve = SpectralCurve::from_samples(
            points.iter().copied().map(SpectralSample::from).collect(),
        );
        WeightedCurve::with_multiplier(curve, multiplier).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_composite() {
        let c = sum_weighted(&[]);
        assert!(c.curve.is_empty());
        assert_eq!(c.contributors, 0);
    }

    #[test]
    fn identical_grids_sum_positionally_with_multipliers() {
        let a = weighted(&[(400.0, 1.0), (500.0, 2.0)], 1.0);
        let b = weighted(&[(400.0, 10.0), (500.0, 20.0)], 0.5);
        let c = sum_weighted(&[&a, &b]);
        assert!(!c.interpolated);
        assert_eq!(c.contributors, 2);
        let y: Vec<f64> = c.curve.intensities().collect();
        assert_eq!(y, vec![6.0, 12.0]);
    }

    #[test]
    fn differing_grids_are_resampled_onto_union() {
        let a = weighted(&[(400.0, 0.0), (420.0, 20.0)], 1.0);
        let b = weighted(&[(410.0, 5.0), (430.0, 5.0)], 1.0);
        let c = sum_weighted(&[&a, &b]);
        assert!(c.interpolated);

        let w: Vec<f64> = c.curve.wavelengths().collect();
        assert_eq!(w, vec![400.0, 410.0, 420.0, 430.0]);

        // Both inputs have 20 nm bins, the union grid 10 nm bins, so each
        // interpolated reading is halved.
        let y: Vec<f64> = c.curve.intensities().collect();
        assert_relative_eq!(y[0], 0.0);
        assert_relative_eq!(y[1], 7.5);
        assert_relative_eq!(y[2], 12.5);
        assert_relative_eq!(y[3], 2.5);
    }

    #[test]
    fn bin_widths_cover_uniform_and_ragged_grids() {
        assert_eq!(bin_widths(&[400.0, 405.0, 410.0]), vec![5.0, 5.0, 5.0]);
        assert_eq!(bin_widths(&[400.0, 402.0, 410.0]), vec![2.0, 5.0, 8.0]);
        assert_eq!(bin_widths(&[550.0]), vec![1.0]);
        assert!(bin_widths(&[]).is_empty());
    }

    #[test]
    fn coarse_curve_keeps_its_sum_next_to_a_fine_one() {
        let fine = weighted(
            &(400..=500).map(|w| (w as f64, 1.0)).collect::<Vec<_>>(),
            1.0,
        );
        let coarse = weighted(
            &(0..=20).map(|i| (400.5 + 5.0 * i as f64, 2.0)).collect::<Vec<_>>(),
            1.0,
        );
        let c = sum_weighted(&[&fine, &coarse]);
        let expected: f64 = fine.samples().chain(coarse.samples()).map(|s| s.intensity).sum();
        let total: f64 = c.curve.intensities().sum();
        assert_relative_eq!(total, expected, max_relative = 0.03);
    }

    #[test]
    fn lone_reading_is_added_unscaled() {
        let a = weighted(&[(400.0, 1.0), (410.0, 1.0)], 1.0);
        let spike = weighted(&[(405.0, 3.0)], 1.0);
        let c = sum_weighted(&[&a, &spike]);
        let y: Vec<f64> = c.curve.intensities().collect();
        // a has 10 nm bins, the union grid 5 nm bins
        assert_relative_eq!(y[1], 0.5 + 3.0);
    }

    #[test]
    fn same_length_but_shifted_grid_is_not_summed_by_index() {
        let a = weighted(&[(400.0, 1.0), (401.0, 1.0)], 1.0);
        let b = weighted(&[(500.0, 1.0), (501.0, 1.0)], 1.0);
        let c = sum_weighted(&[&a, &b]);
        assert!(c.interpolated);
        assert_eq!(c.curve.len(), 4);
    }

    #[test]
    fn single_curve_composite_is_its_scaled_copy() {
        let a = weighted(&[(450.0, 2.0), (460.0, 4.0)], 3.0);
        let c = sum_weighted(&[&a]);
        assert_eq!(c.curve, a.effective());
    }
}
