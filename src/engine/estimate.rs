//! Full recomputation of a team's cached speed estimate.

use tracing::info;

use crate::error::Result;
use crate::season;
use crate::speed::{usable_speed, SpeedModel};
use crate::stats::SpeedSummary;
use crate::storage::{RegattaDatabase, TeamSpeedEstimate};
use crate::TeamId;

/// Recompute the estimate for (team, boat class, season) from raw results
/// and persist it.
///
/// Always a wholesale rebuild, never a delta: the speed model is re-applied
/// to every in-scope result, so formula changes take effect retroactively.
/// Zero valid samples yields `Ok(None)` and leaves any previously persisted
/// row untouched; "no estimate" must stay distinguishable from a genuinely
/// slow team, so it is never written as zero.
pub fn calculate_estimate(
    db: &mut RegattaDatabase,
    model: &dyn SpeedModel,
    team_id: TeamId,
    boat_class: &str,
    season: Option<&str>,
) -> Result<Option<TeamSpeedEstimate>> {
    let window = season::resolve(season);
    let races = db.load_scored_races(team_id, boat_class, window.as_ref())?;

    let mut speeds = Vec::new();
    for scored in &races {
        for result in &scored.results {
            if !result.is_own_team {
                continue;
            }
            if let Some(speed) = usable_speed(model, result, &scored.race, &scored.regatta) {
                speeds.push(speed);
            }
        }
    }

    let Some(summary) = SpeedSummary::from_speeds(&speeds) else {
        return Ok(None);
    };

    info!(
        team_id = team_id.as_i64(),
        boat_class,
        season,
        sample_count = summary.sample_count,
        adjusted_speed = summary.adjusted_speed,
        "recomputed team speed estimate"
    );

    let estimate = db.upsert_team_speed_estimate(
        team_id,
        boat_class,
        season,
        summary.raw_speed,
        summary.adjusted_speed,
        summary.confidence,
        summary.sample_count as u32,
    )?;
    Ok(Some(estimate))
}
