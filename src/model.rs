use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unit latencies are reported and plotted in. Input samples are always nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Ns,
    #[default]
    Us,
    Ms,
}

impl TimeUnit {
    /// Number of nanoseconds in one unit.
    pub fn divisor(self) -> f64 {
        match self {
            TimeUnit::Ns => 1.0,
            TimeUnit::Us => 1_000.0,
            TimeUnit::Ms => 1_000_000.0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
        }
    }

    /// Convert a value expressed in this unit to seconds.
    pub fn to_seconds(self, value: f64) -> f64 {
        value * self.divisor() / 1e9
    }

    /// Decimal places used when printing values in this unit.
    pub fn precision(self) -> usize {
        match self {
            TimeUnit::Ns => 0,
            TimeUnit::Us | TimeUnit::Ms => 2,
        }
    }
}

/// Resolved run configuration, built from the command line.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bins: usize,
    pub unit: TimeUnit,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub export_json: Option<PathBuf>,
    pub json: bool,
    pub plot: bool,
}

/// Result of reading the sample file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The input path does not exist.
    Missing,
    /// The file exists but no line parsed as a number.
    Empty { skipped: usize },
    /// Parsed values in file order, in nanoseconds.
    Samples { values: Vec<f64>, skipped: usize },
}

/// Descriptive statistics over one sample set, all values in `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub unit: TimeUnit,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

/// Shape of the file written by `--export-json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedSummary {
    pub generated_utc: String,
    pub input: PathBuf,
    pub skipped_lines: usize,
    pub stats: LatencyStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_seconds_conversion() {
        assert_eq!(TimeUnit::Us.to_seconds(1_000_000.0), 1.0);
        assert_eq!(TimeUnit::Ns.to_seconds(1e9), 1.0);
        assert_eq!(TimeUnit::Ms.to_seconds(250.0), 0.25);
    }

    #[test]
    fn test_unit_serializes_lowercase() {
        let s = serde_json::to_string(&TimeUnit::Us).unwrap();
        assert_eq!(s, "\"us\"");
    }
}
