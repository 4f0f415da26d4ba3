//! Speed normalization strategy.
//!
//! Converting a raw race result into a comparable speed depends on a
//! conditions-adjustment formula that changes independently of the rest of
//! the engine, so it lives behind the [`SpeedModel`] trait. Aggregation
//! code depends only on the trait and re-invokes it on every pass; speeds
//! are never memoized, so a formula change applies retroactively without
//! manual invalidation.

use tracing::warn;

use crate::storage::models::{Race, RaceResult, Regatta};

/// Result of one normalization attempt; errors mean "unusable sample".
pub type SpeedResult = std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>>;

/// Strategy for turning one result into a scalar speed, plus the pace
/// conversions derived from it.
///
/// Speeds are comparable only within one boat class; callers never compare
/// across classes.
pub trait SpeedModel: Send + Sync {
    /// Speed in meters per second for one result in its race and regatta.
    fn speed_of(&self, result: &RaceResult, race: &Race, regatta: &Regatta) -> SpeedResult;

    /// 500m split at the given speed, formatted `M:SS.s`.
    fn split(&self, speed: f64) -> String {
        format_duration(500.0 / speed)
    }

    /// Time over a standard 2000m course at the given speed, `M:SS.s`.
    fn standard_time(&self, speed: f64) -> String {
        format_duration(2000.0 / speed)
    }
}

/// Apply the model to one result, filtering out unusable samples.
///
/// A model error, a non-positive speed or a non-finite speed all skip the
/// sample; aggregation continues with the rest.
pub fn usable_speed(
    model: &dyn SpeedModel,
    result: &RaceResult,
    race: &Race,
    regatta: &Regatta,
) -> Option<f64> {
    match model.speed_of(result, race, regatta) {
        Ok(speed) if speed.is_finite() && speed > 0.0 => Some(speed),
        Ok(speed) => {
            warn!(
                result_id = result.result_id.as_i64(),
                speed, "skipping result with invalid speed"
            );
            None
        }
        Err(e) => {
            warn!(
                result_id = result.result_id.as_i64(),
                error = %e,
                "skipping result the speed model rejected"
            );
            None
        }
    }
}

/// Default model: course length divided by finish time.
#[derive(Debug, Clone, Copy)]
pub struct DistanceOverTime {
    pub course_meters: f64,
}

impl Default for DistanceOverTime {
    fn default() -> Self {
        Self {
            course_meters: 2000.0,
        }
    }
}

impl SpeedModel for DistanceOverTime {
    fn speed_of(&self, result: &RaceResult, _race: &Race, _regatta: &Regatta) -> SpeedResult {
        let secs = result
            .finish_time_seconds
            .ok_or("result has no finish time")?;
        if secs <= 0.0 {
            return Err(format!("non-positive finish time: {secs}").into());
        }
        Ok(self.course_meters / secs)
    }
}

/// Format a duration in seconds as `M:SS.s` (share-card pace format).
pub fn format_duration(seconds: f64) -> String {
    let tenths = (seconds * 10.0).round() as i64;
    let minutes = tenths / 600;
    let rem = tenths % 600;
    format!("{}:{:02}.{}", minutes, rem / 10, rem % 10)
}
