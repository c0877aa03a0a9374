//! Histogram image rendering.
//!
//! The backend is picked from the output extension: `.svg` goes through the SVG
//! backend, everything else through the bitmap backend (PNG by default).

use crate::histogram::Histogram;
use crate::model::{LatencyStats, TimeUnit};
use anyhow::{anyhow, Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const MEAN_COLOR: RGBColor = RGBColor(214, 39, 40);
const MEDIAN_COLOR: RGBColor = RGBColor(44, 160, 44);

static EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Options controlling figure layout.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub bins: usize,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            bins: 50,
            width: 800,
            height: 400,
            title: "Latency Histogram".to_string(),
        }
    }
}

/// Legend text for a reference line, value in `unit` and in seconds.
pub fn reference_label(name: &str, value: f64, unit: TimeUnit) -> String {
    format!(
        "{name}: {value:.2} {} ({:.6} s)",
        unit.suffix(),
        unit.to_seconds(value)
    )
}

/// Make the embedded font available to plotters under the `sans-serif` family.
fn ensure_font() -> Result<()> {
    let ok = *FONT_REGISTERED.get_or_init(|| {
        register_font("sans-serif", FontStyle::Normal, EMBEDDED_FONT).is_ok()
    });
    if ok {
        Ok(())
    } else {
        Err(anyhow!("embedded chart font could not be loaded"))
    }
}

/// Render the histogram of `samples` with mean/median markers to `path`.
///
/// The parent directory is created if needed; an existing file is overwritten.
pub fn render_histogram(
    path: &Path,
    samples: &[f64],
    stats: &LatencyStats,
    opts: &ChartOptions,
) -> Result<()> {
    let hist = Histogram::from_samples(samples, opts.bins)
        .with_context(|| {
            format!(
                "cannot build a histogram with {} bins from {} samples",
                opts.bins,
                samples.len()
            )
        })?;
    ensure_font()?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let size = (opts.width, opts.height);
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw(&root, &hist, stats, &opts.title)?;
        root.present()
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw(&root, &hist, stats, &opts.title)?;
        root.present()
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    tracing::info!(
        path = %path.display(),
        bins = hist.bins().len(),
        samples = hist.total(),
        "rendered latency histogram"
    );
    Ok(())
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    hist: &Histogram,
    stats: &LatencyStats,
    title: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let y_max = (hist.max_count().max(1) as f64) * 1.05;
    let x_lo = hist.lo().min(stats.mean).min(stats.median);
    let x_hi = hist.hi().max(stats.mean).max(stats.median);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(format!("Latency ({})", stats.unit.suffix()))
        .y_desc("Count")
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart.draw_series(hist.bins().iter().map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], SKY_BLUE.filled())
    }))?;
    chart.draw_series(hist.bins().iter().filter(|b| b.count > 0).map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))
    }))?;

    for (name, value, color) in [
        ("Mean", stats.mean, MEAN_COLOR),
        ("Median", stats.median, MEDIAN_COLOR),
    ] {
        chart
            .draw_series(LineSeries::new(
                [(value, 0.0), (value, y_max)],
                color.stroke_width(2),
            ))?
            .label(reference_label(name, value, stats.unit))
            .legend(move |(x, y)| {
                PathElement::new([(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(("sans-serif", 13))
        .draw()?;

    Ok(())
}
