use crate::model::{LatencyStats, TimeUnit};

/// Rescale nanosecond samples into `unit`.
pub fn to_unit(samples_ns: &[f64], unit: TimeUnit) -> Vec<f64> {
    let divisor = unit.divisor();
    samples_ns.iter().map(|v| v / divisor).collect()
}

/// Percentile `p` (0..=100) of an ascending slice, linearly interpolated between
/// the two nearest order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let rank = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let w = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * w)
}

/// Compute p50/p90/p99, mean and median of samples already expressed in `unit`.
pub fn compute_latency_stats(samples: &[f64], unit: TimeUnit) -> Option<LatencyStats> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let p50 = percentile(&sorted, 50.0)?;
    let p90 = percentile(&sorted, 90.0)?;
    let p99 = percentile(&sorted, 99.0)?;
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;

    Some(LatencyStats {
        unit,
        count: samples.len(),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        mean,
        median: p50,
        p50,
        p90,
        p99,
    })
}
