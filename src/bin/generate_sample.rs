use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavelengths: &[f64],
    peaks: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp))
                .sum();
            (signal + rng.gauss(0.0, noise_level)).max(0.0)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn write_csv(path: &str, wavelengths: &[f64], intensities: &[f64]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record(["wavelength", "intensity"])?;
    for (w, i) in wavelengths.iter().zip(intensities) {
        wtr.write_record([format!("{w}"), format!("{i:.6}")])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_txt(path: &str, wavelengths: &[f64], intensities: &[f64]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "nm mw")?;
    for (w, i) in wavelengths.iter().zip(intensities) {
        writeln!(out, "{w} {i:.6}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // 1 nm grid over the PAR range, plus a coarser 5 nm grid for alignment testing.
    let fine: Vec<f64> = (400..=700).map(f64::from).collect();
    let coarse: Vec<f64> = (0..=60).map(|i| 400.0 + 5.0 * i as f64).collect();

    // (name, grid, peaks: (centre nm, sigma nm, amplitude mW))
    let leds: [(&str, &[f64], Vec<(f64, f64, f64)>); 4] = [
        ("royal_blue", fine.as_slice(), vec![(450.0, 10.0, 12.0)]),
        ("deep_red", fine.as_slice(), vec![(660.0, 9.0, 15.0)]),
        ("far_red_shoulder", coarse.as_slice(), vec![(690.0, 12.0, 6.0), (640.0, 15.0, 2.0)]),
        (
            "white_4000k",
            fine.as_slice(),
            vec![(450.0, 9.0, 8.0), (560.0, 45.0, 6.5), (620.0, 35.0, 3.0)],
        ),
    ];

    for (name, grid, peaks) in &leds {
        let y = generate_spectrum(grid, peaks, 0.05, &mut rng);
        let csv_path = format!("{name}.csv");
        let txt_path = format!("{name}.txt");
        write_csv(&csv_path, grid, &y)?;
        write_txt(&txt_path, grid, &y)?;
        println!("Wrote {csv_path} and {txt_path} ({} samples)", grid.len());
    }

    Ok(())
}
