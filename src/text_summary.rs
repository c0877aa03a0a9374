//! Text summary builder for CLI output.
//!
//! Formats the computed statistics into the human-readable lines printed on stdout.

use crate::model::LatencyStats;
use std::path::Path;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build the percentile and mean/median lines.
pub(crate) fn build_text_summary(stats: &LatencyStats) -> TextSummary {
    let unit = stats.unit.suffix();
    let prec = stats.unit.precision();
    let lines = vec![
        format!(
            "p50={:.prec$} {unit} p90={:.prec$} {unit} p99={:.prec$} {unit}",
            stats.p50, stats.p90, stats.p99
        ),
        format!(
            "mean={:.prec$} {unit} median={:.prec$} {unit}",
            stats.mean, stats.median
        ),
    ];
    TextSummary { lines }
}

pub(crate) fn saved_line(path: &Path) -> String {
    format!("Saved {}", path.display())
}

pub(crate) fn missing_file_line(path: &Path) -> String {
    format!("No data file found at {}", path.display())
}

pub(crate) const NO_LATENCIES_LINE: &str = "No latencies to plot";
