use crate::chart::{self, ChartOptions};
use crate::histogram::MAX_BINS;
use crate::model::{LoadOutcome, PlotConfig, TimeUnit};
use crate::{export, loader, metrics, text_summary};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "latency-plot",
    version,
    about = "Summarize nanosecond latency samples and render an annotated histogram"
)]
pub struct Cli {
    /// Sample file, one nanosecond value per line
    #[arg(long, default_value = "data/latencies.csv")]
    pub input: PathBuf,

    /// Histogram image path (.png, or .svg for vector output)
    #[arg(long, default_value = "plots/latency_hist.png")]
    pub output: PathBuf,

    /// Number of equal-width histogram bins
    #[arg(
        long,
        default_value_t = 50,
        value_parser = clap::value_parser!(u64).range(1..=MAX_BINS as u64)
    )]
    pub bins: u64,

    /// Unit used for reporting and the horizontal axis
    #[arg(long, value_enum, default_value_t = TimeUnit::Us)]
    pub unit: TimeUnit,

    /// Image width in pixels
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(64..))]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 400, value_parser = clap::value_parser!(u32).range(64..))]
    pub height: u32,

    /// Chart caption
    #[arg(long, default_value = "Latency Histogram")]
    pub title: String,

    /// Also write the computed summary as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Print the summary as JSON instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Report statistics only, without rendering the image
    #[arg(long)]
    pub no_plot: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Build a `PlotConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> PlotConfig {
    PlotConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        bins: args.bins as usize,
        unit: args.unit,
        width: args.width,
        height: args.height,
        title: args.title.clone(),
        export_json: args.export_json.clone(),
        json: args.json,
        plot: !args.no_plot,
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Input missing or without numeric lines; nothing was rendered.
    NoData,
    Reported { saved: Option<PathBuf> },
}

pub fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    tracing::debug!(?cfg, "resolved configuration");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cfg, &mut out)?;
    out.flush().context("flush stdout")?;
    Ok(())
}

/// Load, summarize, report and render according to `cfg`, writing report lines to `out`.
pub fn execute<W: Write>(cfg: &PlotConfig, out: &mut W) -> Result<RunOutcome> {
    let (samples_ns, skipped) = match loader::load_samples(&cfg.input)? {
        LoadOutcome::Missing => {
            writeln!(out, "{}", text_summary::missing_file_line(&cfg.input))?;
            return Ok(RunOutcome::NoData);
        }
        LoadOutcome::Empty { skipped } => {
            tracing::warn!(skipped, "input file has no numeric lines");
            writeln!(out, "{}", text_summary::NO_LATENCIES_LINE)?;
            return Ok(RunOutcome::NoData);
        }
        LoadOutcome::Samples { values, skipped } => (values, skipped),
    };

    let samples = metrics::to_unit(&samples_ns, cfg.unit);
    let stats = metrics::compute_latency_stats(&samples, cfg.unit)
        .context("no samples left to summarize")?;
    let summary = export::summarize(&cfg.input, skipped, stats);

    if cfg.json {
        let body = serde_json::to_string_pretty(&summary).context("serialize latency summary")?;
        writeln!(out, "{body}")?;
    } else {
        for line in text_summary::build_text_summary(&stats).lines {
            writeln!(out, "{line}")?;
        }
    }

    if let Some(p) = cfg.export_json.as_deref() {
        export::export_json(p, &summary)?;
    }

    if !cfg.plot {
        return Ok(RunOutcome::Reported { saved: None });
    }

    let opts = ChartOptions {
        bins: cfg.bins,
        width: cfg.width,
        height: cfg.height,
        title: cfg.title.clone(),
    };
    chart::render_histogram(&cfg.output, &samples, &stats, &opts)?;

    let saved = text_summary::saved_line(&cfg.output);
    if cfg.json {
        // Keep stdout parseable as a single JSON document.
        eprintln!("{saved}");
    } else {
        writeln!(out, "{saved}")?;
    }

    Ok(RunOutcome::Reported {
        saved: Some(cfg.output.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::reference_label;
    use crate::model::ExportedSummary;
    use std::path::Path;

    fn config_in(dir: &Path, extra: &[&str]) -> PlotConfig {
        let input = dir.join("data/latencies.csv");
        let output = dir.join("plots/latency_hist.svg");
        let mut argv = vec![
            "latency-plot".to_string(),
            "--input".to_string(),
            input.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        build_config(&Cli::try_parse_from(argv).unwrap())
    }

    fn write_input(cfg: &PlotConfig, body: &str) {
        std::fs::create_dir_all(cfg.input.parent().unwrap()).unwrap();
        std::fs::write(&cfg.input, body).unwrap();
    }

    fn run_capture(cfg: &PlotConfig) -> (RunOutcome, String) {
        let mut buf = Vec::new();
        let outcome = execute(cfg, &mut buf).unwrap();
        (outcome, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_defaults_match_fixed_paths() {
        let cfg = build_config(&Cli::try_parse_from(["latency-plot"]).unwrap());
        assert_eq!(cfg.input, PathBuf::from("data/latencies.csv"));
        assert_eq!(cfg.output, PathBuf::from("plots/latency_hist.png"));
        assert_eq!(cfg.bins, 50);
        assert_eq!(cfg.unit, TimeUnit::Us);
        assert_eq!((cfg.width, cfg.height), (800, 400));
        assert!(cfg.plot);
        assert!(!cfg.json);
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(Cli::try_parse_from(["latency-plot", "--bins", "0"]).is_err());
    }

    #[test]
    fn test_bin_count_is_bounded() {
        assert!(Cli::try_parse_from(["latency-plot", "--bins", "100000000000"]).is_err());
        let max = MAX_BINS.to_string();
        let args = Cli::try_parse_from(["latency-plot", "--bins", max.as_str()]).unwrap();
        let cfg = build_config(&args);
        assert_eq!(cfg.bins, MAX_BINS);
    }

    #[test]
    fn test_missing_input_reports_and_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &[]);

        let (outcome, stdout) = run_capture(&cfg);

        assert_eq!(outcome, RunOutcome::NoData);
        assert_eq!(
            stdout,
            format!("No data file found at {}\n", cfg.input.display())
        );
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_non_numeric_input_reports_and_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &[]);
        write_input(&cfg, "latency\nfoo\n\nbar\n");

        let (outcome, stdout) = run_capture(&cfg);

        assert_eq!(outcome, RunOutcome::NoData);
        assert_eq!(stdout, "No latencies to plot\n");
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_full_run_reports_p50_for_linear_samples() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &[]);
        let body: String = (1..=100).map(|i| format!("{}\n", i * 1000)).collect();
        write_input(&cfg, &body);

        let (outcome, stdout) = run_capture(&cfg);

        assert_eq!(
            outcome,
            RunOutcome::Reported {
                saved: Some(cfg.output.clone())
            }
        );
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines[0], "p50=50.50 us p90=90.10 us p99=99.01 us");
        assert_eq!(lines[1], "mean=50.50 us median=50.50 us");
        assert_eq!(lines[2], format!("Saved {}", cfg.output.display()));
        assert!(cfg.output.exists());
    }

    #[test]
    fn test_mixed_input_uses_only_valid_lines() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("summary.json");
        let export_arg = export.display().to_string();
        let cfg = config_in(dir.path(), &["--export-json", export_arg.as_str(), "--no-plot"]);
        write_input(&cfg, "1000\noops\n3000\n\n2000\nNaN-ish\n");

        let (outcome, stdout) = run_capture(&cfg);

        assert_eq!(outcome, RunOutcome::Reported { saved: None });
        assert_eq!(stdout.lines().next(), Some("p50=2.00 us p90=2.80 us p99=2.98 us"));
        let summary: ExportedSummary =
            serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
        assert_eq!(summary.stats.count, 3);
        assert_eq!(summary.skipped_lines, 3);
        assert_eq!(summary.stats.p50, 2.0);
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_second_run_overwrites_image() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &[]);
        write_input(&cfg, "1000\n2000\n4000\n");
        run_capture(&cfg);
        let first = std::fs::read_to_string(&cfg.output).unwrap();

        write_input(&cfg, "8000\n9000\n");
        let (outcome, _) = run_capture(&cfg);
        let second = std::fs::read_to_string(&cfg.output).unwrap();

        assert!(matches!(outcome, RunOutcome::Reported { saved: Some(_) }));
        assert_ne!(first, second);
        assert!(second.contains(&reference_label("Mean", 8.5, TimeUnit::Us)));
    }

    #[test]
    fn test_chart_annotations_match_printed_values() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &[]);
        write_input(&cfg, "1200\n3400\n5600\n7800\n123456\n");

        let (_, stdout) = run_capture(&cfg);
        let svg = std::fs::read_to_string(&cfg.output).unwrap();

        let samples = metrics::to_unit(&[1200.0, 3400.0, 5600.0, 7800.0, 123456.0], TimeUnit::Us);
        let stats = metrics::compute_latency_stats(&samples, TimeUnit::Us).unwrap();
        assert!(stdout.contains(&format!(
            "mean={:.2} us median={:.2} us",
            stats.mean, stats.median
        )));
        assert!(svg.contains(&reference_label("Mean", stats.mean, TimeUnit::Us)));
        assert!(svg.contains(&reference_label("Median", stats.median, TimeUnit::Us)));
    }

    #[test]
    fn test_json_mode_prints_parseable_summary() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), &["--json", "--unit", "ns", "--no-plot"]);
        write_input(&cfg, "10\n20\n30\n");

        let (_, stdout) = run_capture(&cfg);

        let summary: ExportedSummary = serde_json::from_str(&stdout).unwrap();
        assert_eq!(summary.stats.unit, TimeUnit::Ns);
        assert_eq!(summary.stats.p50, 20.0);
        assert_eq!(summary.stats.mean, 20.0);
    }
}
