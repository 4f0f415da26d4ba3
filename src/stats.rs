//! Robust aggregation over noisy speed samples.
//!
//! Real-world regatta data is messy: mis-keyed times, shortened courses,
//! weather-wrecked pieces. Ranking therefore runs on the median while the
//! mean is kept for trend display only.

/// Median of a sample: middle element for odd n, average of the two middle
/// elements for even n. `None` on an empty sample.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Unweighted arithmetic mean. `None` on an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample-size confidence: `min(1.0, n / 5)`.
///
/// A saturation heuristic, not a statistical interval: five or more
/// results is treated as a full sample.
pub fn confidence(sample_count: usize) -> f64 {
    (sample_count as f64 / 5.0).min(1.0)
}

/// One aggregation pass over a filtered speed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSummary {
    /// Mean speed, for trend display only.
    pub raw_speed: f64,
    /// Median speed; the value every ranking and comparison uses.
    pub adjusted_speed: f64,
    pub confidence: f64,
    pub sample_count: usize,
}

impl SpeedSummary {
    /// Summarize a sample of valid speeds. An empty sample is "no estimate
    /// available" (`None`), never a zero-speed summary.
    pub fn from_speeds(speeds: &[f64]) -> Option<Self> {
        Some(Self {
            raw_speed: mean(speeds)?,
            adjusted_speed: median(speeds)?,
            confidence: confidence(speeds.len()),
            sample_count: speeds.len(),
        })
    }
}
