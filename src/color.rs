use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Wavelength → display colour
// ---------------------------------------------------------------------------

const GAMMA: f64 = 0.8;

/// Approximate display colour of monochromatic light, clamped to 400-700 nm.
///
/// Piecewise-linear hue ramp with a fade at the violet end; used to fill the
/// composite spectrum.
pub fn wavelength_to_rgb(wavelength: f64) -> [f64; 3] {
    let w = wavelength.clamp(400.0, 700.0);
    let (r, g, b) = if w < 440.0 {
        (-(w - 440.0) / 40.0, 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, (w - 440.0) / 50.0, 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, -(w - 510.0) / 20.0)
    } else if w < 580.0 {
        ((w - 510.0) / 70.0, 1.0, 0.0)
    } else if w < 645.0 {
        (1.0, -(w - 645.0) / 65.0, 0.0)
    } else {
        (1.0, 0.0, 0.0)
    };

    let attenuation = if w < 420.0 {
        0.3 + 0.7 * (w - 400.0) / 20.0
    } else {
        1.0
    };

    [r, g, b].map(|c| (c * attenuation).powf(GAMMA).clamp(0.0, 1.0))
}

/// [`wavelength_to_rgb`] as an egui colour.
pub fn wavelength_color(wavelength: f64) -> Color32 {
    let [r, g, b] = wavelength_to_rgb(wavelength);
    Color32::from_rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn primary_regions() {
        assert_eq!(wavelength_color(450.0).b(), 255);
        assert_eq!(wavelength_color(530.0).g(), 255);
        assert_eq!(wavelength_color(680.0), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(wavelength_color(900.0), wavelength_color(700.0));
        assert_eq!(wavelength_color(300.0), wavelength_color(400.0));
    }

    #[test]
    fn violet_end_is_dimmed() {
        let [r, _, b] = wavelength_to_rgb(400.0);
        assert!(b < 1.0);
        assert!(r > 0.0);
    }
}
