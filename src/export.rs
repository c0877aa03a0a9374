use crate::model::{ExportedSummary, LatencyStats};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Wrap `stats` with run metadata for export.
pub fn summarize(input: &Path, skipped_lines: usize, stats: LatencyStats) -> ExportedSummary {
    let generated_utc = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    ExportedSummary {
        generated_utc,
        input: input.to_path_buf(),
        skipped_lines,
        stats,
    }
}

/// Write `summary` as pretty JSON, creating the parent directory if needed.
pub fn export_json(path: &Path, summary: &ExportedSummary) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export directory {}", dir.display()))?;
    }
    let body = serde_json::to_string_pretty(summary).context("serialize latency summary")?;
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported latency summary");
    Ok(path.to_path_buf())
}
