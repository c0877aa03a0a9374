//! Sample file reader.
//!
//! One value per line, nanoseconds. Lines that do not parse as a float are dropped.

use crate::model::LoadOutcome;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read latency samples from `path`.
///
/// A missing file is reported as [`LoadOutcome::Missing`] rather than an error;
/// any other I/O failure propagates.
pub fn load_samples(path: &Path) -> Result<LoadOutcome> {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "input file not found");
            return Ok(LoadOutcome::Missing);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    };

    let (values, skipped) = parse_lines(BufReader::new(file))
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        parsed = values.len(),
        skipped,
        "loaded latency samples"
    );

    if values.is_empty() {
        Ok(LoadOutcome::Empty { skipped })
    } else {
        Ok(LoadOutcome::Samples { values, skipped })
    }
}

/// Parse every line of `reader`, returning the numeric values and the count of dropped lines.
fn parse_lines<R: BufRead>(reader: R) -> std::io::Result<(Vec<f64>, usize)> {
    let mut values = Vec::new();
    let mut skipped = 0usize;
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let parsed = std::str::from_utf8(&line)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok());
        match parsed {
            Some(v) => values.push(v),
            None => {
                tracing::debug!(line = idx + 1, "skipping non-numeric line");
                skipped += 1;
            }
        }
    }
    Ok((values, skipped))
}
