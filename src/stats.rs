//! Statistics engine - column aggregation and error analysis
//!
//! All functions are pure and total. Empty input yields `None` rather than
//! a stats object full of `NaN`, so nothing non-finite reaches display or
//! export.
//!
//! Sums use Kahan (compensated) summation for numerical stability. Inputs
//! beyond [`SCALE_LIMIT`] in magnitude are scaled down before summing, and a
//! result that still cannot be represented finitely is reported as `None`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::experiment::{Reading, Run};
use crate::quantity::Quantity;

/// Summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected).
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Number of finite numeric values aggregated.
    pub n: usize,
}

/// Largest magnitude summed without rescaling.
pub const SCALE_LIMIT: f64 = 1e150;

fn kahan_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut c = 0.0;
    for v in values {
        let y = v - c;
        let t = sum + y;
        c = (t - sum) - y;
        sum = t;
    }
    sum
}

/// Finite numeric views of the given quantities, in order.
pub fn numeric<'a>(values: impl IntoIterator<Item = &'a Quantity>) -> Vec<f64> {
    values.into_iter().filter_map(Quantity::as_f64).collect()
}

/// Aggregate raw values, skipping anything that is not a finite number.
///
/// Returns `None` when no value survives the filter, or when the mean or
/// standard deviation would overflow. A single sample has `std_dev = 0`.
#[must_use]
pub fn compute_stats(values: &[f64]) -> Option<ColumnStats> {
    let nums: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if nums.is_empty() {
        return None;
    }
    let n = nums.len();
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let peak = nums.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let scale = if peak > SCALE_LIMIT { peak } else { 1.0 };

    let mean = kahan_sum(nums.iter().map(|v| v / scale)) / count;
    let squared = kahan_sum(nums.iter().map(|v| {
        let d = v / scale - mean;
        d * d
    }));
    #[allow(clippy::cast_precision_loss)]
    let dof = n.saturating_sub(1).max(1) as f64;
    let std_dev = (squared / dof).sqrt() * scale;
    let mean = mean * scale;
    if !(mean.is_finite() && std_dev.is_finite()) {
        debug!(n, peak, "column statistics overflow");
        return None;
    }
    let min = nums.iter().copied().fold(f64::INFINITY, f64::min);
    let max = nums.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ColumnStats {
        mean,
        std_dev,
        min,
        max,
        n,
    })
}

/// Values of `key` across readings (inputs first, then outputs).
pub fn column<'a>(readings: &'a [Reading], key: &'a str) -> impl Iterator<Item = &'a Quantity> {
    readings.iter().filter_map(move |r| r.get(key))
}

/// [`compute_stats`] over one column of a reading collection.
#[must_use]
pub fn column_stats(readings: &[Reading], key: &str) -> Option<ColumnStats> {
    compute_stats(&numeric(column(readings, key)))
}

/// Extended error-analysis summary of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Basic column statistics.
    #[serde(flatten)]
    pub stats: ColumnStats,
    /// Sample variance (`std_dev²`).
    pub variance: f64,
    /// `max − min`.
    pub range: f64,
    /// Standard error of the mean, `std_dev / √n`.
    pub std_error: f64,
    /// Element at index `⌊n/2⌋` of the sorted values.
    pub median: f64,
    /// Coefficient of variation in percent of `|mean|` (0 when mean is 0).
    pub cv: f64,
}

/// Compute the extended summary.
///
/// `None` for no numeric values, or when a derived field (variance, range,
/// coefficient of variation) overflows.
#[must_use]
pub fn summarize(values: &[f64]) -> Option<Summary> {
    let stats = compute_stats(values)?;
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let median = sorted[sorted.len() / 2];
    #[allow(clippy::cast_precision_loss)]
    let std_error = stats.std_dev / (stats.n as f64).sqrt();
    let cv = if stats.mean == 0.0 {
        0.0
    } else {
        stats.std_dev / stats.mean.abs() * 100.0
    };

    let summary = Summary {
        stats,
        variance: stats.std_dev * stats.std_dev,
        range: stats.max - stats.min,
        std_error,
        median,
        cv,
    };
    [summary.variance, summary.range, summary.cv]
        .iter()
        .all(|v| v.is_finite())
        .then_some(summary)
}

/// Least-squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearFit {
    /// Gradient.
    pub slope: f64,
    /// Value at `x = 0`.
    pub intercept: f64,
    /// Coefficient of determination (1 when all `y` are equal).
    pub r_squared: f64,
}

impl LinearFit {
    /// Fitted `y` at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Fit a straight line through `(x, y)` points.
///
/// Returns `None` for fewer than two points, when every `x` is equal, or
/// when the fit overflows.
#[must_use]
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sx = kahan_sum(points.iter().map(|p| p.0));
    let sy = kahan_sum(points.iter().map(|p| p.1));
    let sxy = kahan_sum(points.iter().map(|p| p.0 * p.1));
    let sxx = kahan_sum(points.iter().map(|p| p.0 * p.0));
    let denom = n.mul_add(sxx, -(sx * sx));
    if denom.abs() <= f64::EPSILON * n * sxx.abs().max(1.0) {
        return None;
    }
    let slope = n.mul_add(sxy, -(sx * sy)) / denom;
    let intercept = slope.mul_add(-sx, sy) / n;
    let y_mean = sy / n;
    let ss_tot = kahan_sum(points.iter().map(|p| (p.1 - y_mean).powi(2)));
    let ss_res = kahan_sum(
        points
            .iter()
            .map(|p| (p.1 - slope.mul_add(p.0, intercept)).powi(2)),
    );
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };
    if !(slope.is_finite() && intercept.is_finite() && r_squared.is_finite()) {
        return None;
    }

    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// `|measured − theoretical| / |theoretical| · 100`, or `None` when the
/// theoretical value is zero.
#[must_use]
pub fn percent_error(measured: f64, theoretical: f64) -> Option<f64> {
    if theoretical == 0.0 || !theoretical.is_finite() || !measured.is_finite() {
        return None;
    }
    Some(((measured - theoretical) / theoretical).abs() * 100.0)
}

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 8;

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Inclusive lower edge.
    pub start: f64,
    /// Upper edge (inclusive for the last bin).
    pub end: f64,
    /// Number of values in the bin.
    pub count: usize,
}

/// Equal-width histogram over `[min, max]`. A zero range uses width 1.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bins = bins.max(1);
    #[allow(clippy::cast_precision_loss)]
    let width = match max / bins as f64 - min / bins as f64 {
        w if w > 0.0 => w,
        _ => 1.0,
    };
    let mut counts = vec![0usize; bins];
    for v in finite {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let i = ((v / width - min / width).floor() as usize).min(bins - 1);
        counts[i] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            #[allow(clippy::cast_precision_loss)]
            let start = width.mul_add(i as f64, min);
            Bin {
                start,
                end: start + width,
                count,
            }
        })
        .collect()
}

/// Per-run statistics of one output key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunComparison {
    /// Output key being compared.
    pub key: String,
    /// `(run label, stats)` in run order; `None` where a run has no
    /// numeric values for the key.
    pub runs: Vec<(String, Option<ColumnStats>)>,
}

/// Side-by-side statistics for every output key of the first run.
#[must_use]
pub fn compare_runs(runs: &[Run]) -> Vec<RunComparison> {
    let Some(first) = runs.first().and_then(|r| r.readings().first()) else {
        return Vec::new();
    };
    first
        .outputs()
        .keys()
        .map(|key| RunComparison {
            key: key.to_string(),
            runs: runs
                .iter()
                .map(|run| {
                    let values = numeric(run.readings().iter().filter_map(|r| r.outputs().get(key)));
                    (run.label().to_string(), compute_stats(&values))
                })
                .collect(),
        })
        .collect()
}
