use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Polygon};

use crate::color::wavelength_color;
use crate::data::model::SpectralCurve;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Spectral plots (central panel)
// ---------------------------------------------------------------------------

/// Owned plot points; the result does not borrow `curve`.
fn curve_points(curve: &SpectralCurve) -> PlotPoints<'static> {
    curve
        .samples()
        .iter()
        .map(|s| [s.wavelength, s.intensity])
        .collect()
}

/// Render the three stacked plots: inputs, composite, normalised composite.
pub fn spectral_plots(ui: &mut Ui, state: &AppState) {
    if state.entries.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open spectrum files to begin  (File → Open…)");
        });
        return;
    }

    let height = (ui.available_height() / 3.0 - 8.0).max(120.0);
    input_plot(ui, state, height);
    composite_plot(ui, &state.composite.curve, height);
    normalized_plot(ui, &state.composite.curve, height);
}

fn input_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let y_label = if state.settings.normalize_each {
        "Relative intensity"
    } else {
        "Intensity (mW)"
    };

    Plot::new("input_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Wavelength (nm)")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, entry) in state.entries.iter().enumerate() {
                let weighted = &entry.spectrum.weighted;
                let curve = if state.settings.normalize_each {
                    weighted.curve().normalized()
                } else {
                    weighted.effective()
                };
                let color = state
                    .palette
                    .get(idx)
                    .copied()
                    .unwrap_or(Color32::LIGHT_BLUE);
                let name = format!("{} ×{}", entry.spectrum.name, weighted.multiplier());

                plot_ui.line(
                    Line::new(curve_points(&curve))
                        .name(&name)
                        .color(color)
                        .width(1.5),
                );
            }
        });
}

/// Composite spectrum with each segment filled in its wavelength colour.
fn composite_plot(ui: &mut Ui, curve: &SpectralCurve, height: f32) {
    Plot::new("composite_plot")
        .height(height)
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Total intensity (mW)")
        .include_x(380.0)
        .include_x(720.0)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for pair in curve.samples().windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let mid = 0.5 * (a.wavelength + b.wavelength);
                let quad = vec![
                    [a.wavelength, 0.0],
                    [a.wavelength, a.intensity],
                    [b.wavelength, b.intensity],
                    [b.wavelength, 0.0],
                ];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(quad))
                        .fill_color(wavelength_color(mid).gamma_multiply(0.8))
                        .stroke(Stroke::NONE),
                );
            }
            plot_ui.line(
                Line::new(curve_points(curve))
                    .color(Color32::WHITE)
                    .width(1.5),
            );
        });
}

fn normalized_plot(ui: &mut Ui, curve: &SpectralCurve, height: f32) {
    let normalized = curve.normalized();
    Plot::new("normalized_plot")
        .height(height)
        .x_axis_label("Wavelength (nm)")
        .y_axis_label("Relative intensity")
        .include_y(0.0)
        .include_y(1.05)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(curve_points(&normalized))
                    .color(Color32::from_rgb(0x34, 0x98, 0xdb))
                    .fill(0.0)
                    .width(1.5),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_points_outlive_their_curve() {
        let points = {
            let curve =
                SpectralCurve::from_arrays(&[400.0, 500.0, 600.0], &[1.0, 2.0, 3.0]).unwrap();
            curve_points(&curve.scaled(2.0))
        };
        let xy: Vec<[f64; 2]> = points.points().iter().map(|p| [p.x, p.y]).collect();
        assert_eq!(xy, vec![[400.0, 2.0], [500.0, 4.0], [600.0, 6.0]]);
    }
}
