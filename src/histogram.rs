//! Equal-width binning over the sample range.

/// Upper bound on the bin count accepted from the command line.
pub const MAX_BINS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `samples` into `bins` equal-width buckets spanning `[min, max]`.
    ///
    /// Every bucket is half-open except the last, which also holds `max`. A
    /// degenerate range (all samples equal) is widened to `v - 0.5 .. v + 0.5`.
    /// Returns `None` for an empty sample set or a bin count outside `1..=MAX_BINS`.
    pub fn from_samples(samples: &[f64], bins: usize) -> Option<Self> {
        if samples.is_empty() || bins == 0 || bins > MAX_BINS {
            return None;
        }
        let (mut lo, mut hi) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                lo: lo + width * i as f64,
                hi: if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in samples {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }

        Some(Self { bins: out })
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn lo(&self) -> f64 {
        self.bins[0].lo
    }

    pub fn hi(&self) -> f64 {
        self.bins[self.bins.len() - 1].hi
    }

    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}
