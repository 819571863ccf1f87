use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{SpectralCurve, SpectralSample};
use crate::error::LoadError;

/// Accepted header pairs: (wavelength column, intensity column).
const COLUMN_PAIRS: [(&str, &str); 2] = [("wavelength", "intensity"), ("nm", "mw")];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a spectral curve from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – header row naming `wavelength,intensity` or `nm,mw`
/// * `.txt` / `.dat` / `.tsv` – whitespace-delimited, same header names
pub fn load_file(path: &Path) -> Result<SpectralCurve> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let curve = match ext.as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        "txt" | "dat" | "tsv" => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_text(BufReader::new(file))
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
    .with_context(|| format!("loading spectrum {}", path.display()))?;

    log::info!(
        "Loaded {} samples from {} (range {:?})",
        curve.len(),
        path.display(),
        curve.range()
    );
    Ok(curve)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse comma-separated data with a named header row.
/// Columns other than the wavelength/intensity pair are ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<SpectralCurve, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }
    let (w_idx, i_idx) = locate_columns(&headers)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_pair(record.get(w_idx), record.get(i_idx)) {
            Some(sample) => rows.push(sample),
            None => dropped += 1,
        }
    }

    finish(rows, dropped)
}

// ---------------------------------------------------------------------------
// Whitespace-delimited text
// ---------------------------------------------------------------------------

/// Parse whitespace-delimited text (`nm mw` header followed by two columns).
/// Blank lines and `#` comments are skipped.
pub fn parse_text<R: BufRead>(reader: R) -> Result<SpectralCurve, LoadError> {
    let mut lines = reader.lines();

    let headers = loop {
        match lines.next() {
            None => return Err(LoadError::Empty),
            Some(line) => {
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                break split_fields(trimmed).map(normalize_header).collect::<Vec<_>>();
            }
        }
    };
    let (w_idx, i_idx) = locate_columns(&headers)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = split_fields(trimmed).collect();
        match parse_pair(fields.get(w_idx).copied(), fields.get(i_idx).copied()) {
            Some(sample) => rows.push(sample),
            None => dropped += 1,
        }
    }

    finish(rows, dropped)
}

// -- helpers --

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|f| !f.is_empty())
}

fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase()
}

fn locate_columns(headers: &[String]) -> Result<(usize, usize), LoadError> {
    COLUMN_PAIRS
        .iter()
        .find_map(|(w, i)| {
            let w_idx = headers.iter().position(|h| h == w)?;
            let i_idx = headers.iter().position(|h| h == i)?;
            Some((w_idx, i_idx))
        })
        .ok_or_else(|| LoadError::MissingColumns {
            found: headers.to_vec(),
        })
}

fn parse_pair(wavelength: Option<&str>, intensity: Option<&str>) -> Option<SpectralSample> {
    let w = wavelength?.trim().parse::<f64>().ok()?;
    let i = intensity?.trim().parse::<f64>().ok()?;
    (w.is_finite() && i.is_finite()).then(|| SpectralSample::new(w, i))
}

fn finish(rows: Vec<SpectralSample>, dropped: usize) -> Result<SpectralCurve, LoadError> {
    if dropped > 0 {
        log::warn!("Dropped {dropped} non-numeric rows");
    }
    if rows.is_empty() {
        return Err(LoadError::NoSamples { dropped });
    }

    let n_rows = rows.len();
    let curve = SpectralCurve::from_samples(rows);
    if curve.len() < n_rows {
        log::warn!(
            "Dropped {} rows with duplicate wavelengths",
            n_rows - curve.len()
        );
    }
    if curve.has_negative() {
        log::warn!("Spectrum contains negative intensity readings");
    }
    Ok(curve)
}
