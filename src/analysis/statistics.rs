use crate::models::Reading;
use serde::Serialize;

/// Anomaly detection needs enough points for a stable variance estimate.
const MIN_ANOMALY_SAMPLE: usize = 5;

/// Aggregate statistics over a slice of readings. Every field is `None` for
/// empty input; zero is a valid reading value and must stay distinguishable
/// from "no data".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub stddev: Option<f64>,
}

impl SeriesSummary {
    pub fn empty() -> Self {
        Self {
            min: None,
            max: None,
            mean: None,
            median: None,
            stddev: None,
        }
    }
}

/// Compute min/max/mean/median over the `value` field. `stddev` is the
/// sample standard deviation and needs at least two entries.
pub fn summary(entries: &[Reading]) -> SeriesSummary {
    if entries.is_empty() {
        return SeriesSummary::empty();
    }

    let values: Vec<f64> = entries.iter().map(|r| r.value).collect();
    let n = values.len() as f64;

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let stddev = if values.len() > 1 {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (n - 1.0)).sqrt())
    } else {
        None
    };

    SeriesSummary {
        min: Some(min),
        max: Some(max),
        mean: Some(mean),
        median: Some(median),
        stddev,
    }
}

/// Flag entries whose absolute deviation from the population mean exceeds
/// `z_threshold` standard deviations. Fewer than five entries cannot support
/// a stable estimate and yield no flags; a zero stddev flags nothing.
pub fn detect_anomalies(entries: &[Reading], z_threshold: f64) -> Vec<Reading> {
    if entries.len() < MIN_ANOMALY_SAMPLE {
        return Vec::new();
    }

    let n = entries.len() as f64;
    let mean = entries.iter().map(|r| r.value).sum::<f64>() / n;
    let variance = entries.iter().map(|r| (r.value - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|r| (r.value - mean).abs() > z_threshold * stddev)
        .cloned()
        .collect()
}
