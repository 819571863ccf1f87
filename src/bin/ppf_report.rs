//! Headless PPF / CCT report over one or more spectrum files.
//!
//! ```text
//! ppf-report blue.csv red.txt -m 1.0 -m 0.5 --bands six
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use spectral_ppf::config::{BandPreset, Settings};
use spectral_ppf::data::align::sum_weighted;
use spectral_ppf::data::loader::load_file;
use spectral_ppf::data::model::WeightedCurve;
use spectral_ppf::metrics::IntegrationMethod;
use spectral_ppf::report::{write_curve_csv, write_ppf_csv, SpectrumReport};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Bands {
    /// Blue / green / red, 100 nm each
    Three,
    /// Six colour bands (violet-blue to orange-red)
    Six,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Per-sample sum (w * y * K for every sample)
    Riemann,
    /// Trapezoid rule between consecutive samples
    Trapezoidal,
}

#[derive(Parser, Debug)]
#[command(name = "ppf-report", about = "Sum spectra and report PPF per band and CCT")]
struct Args {
    /// Spectrum files (.csv with wavelength,intensity or nm,mw headers; .txt whitespace)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Multiplier per file, in file order (missing entries default to 1.0)
    #[arg(short, long = "multiplier")]
    multipliers: Vec<f64>,

    /// JSON settings file; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Band layout
    #[arg(long, value_enum)]
    bands: Option<Bands>,

    /// Accumulation method
    #[arg(long, value_enum)]
    method: Option<Method>,

    /// Skip the CCT estimate
    #[arg(long)]
    no_cct: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the per-wavelength PPF table to this CSV file
    #[arg(long)]
    export_ppf: Option<PathBuf>,

    /// Write the composite spectrum to this CSV file
    #[arg(long)]
    export_composite: Option<PathBuf>,
}

fn settings_from(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::default(),
    };
    match args.bands {
        Some(Bands::Three) => settings.band_set = BandPreset::Three,
        Some(Bands::Six) => settings.band_set = BandPreset::Six,
        None => {}
    }
    match args.method {
        Some(Method::Riemann) => settings.integration = IntegrationMethod::Riemann,
        Some(Method::Trapezoidal) => settings.integration = IntegrationMethod::Trapezoidal,
        None => {}
    }
    if args.no_cct {
        settings.show_cct = false;
    }
    Ok(settings)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = settings_from(&args)?;

    if args.multipliers.len() > args.files.len() {
        bail!(
            "{} multipliers given for {} files",
            args.multipliers.len(),
            args.files.len()
        );
    }

    let mut weighted = Vec::with_capacity(args.files.len());
    for (i, path) in args.files.iter().enumerate() {
        let curve = load_file(path)?;
        let multiplier = args.multipliers.get(i).copied().unwrap_or(1.0);
        let w = WeightedCurve::with_multiplier(curve, multiplier)
            .with_context(|| format!("multiplier for {}", path.display()))?;
        weighted.push(w);
    }

    let refs: Vec<&WeightedCurve> = weighted.iter().collect();
    let composite = sum_weighted(&refs);
    let report = SpectrumReport::compute(&composite, &settings);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }

    if let Some(path) = &args.export_ppf {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_ppf_csv(&composite.curve, file).context("writing PPF table")?;
        log::info!("Wrote PPF table to {}", path.display());
    }
    if let Some(path) = &args.export_composite {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        write_curve_csv(&composite.curve, file).context("writing composite")?;
        log::info!("Wrote composite spectrum to {}", path.display());
    }

    Ok(())
}
