//! Per-result speed breakdown for a single race.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::OWN_TEAM_LABEL;
use crate::error::{EngineError, Result};
use crate::speed::{usable_speed, SpeedModel};
use crate::storage::RegattaDatabase;
use crate::{RaceId, TeamId};

/// One crew's line in a race breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultBreakdown {
    pub team_name: String,
    pub is_own_team: bool,
    pub place: Option<u32>,
    pub finish_time_seconds: Option<f64>,
    /// `None` when the result is an unusable sample for the speed model.
    pub speed: Option<f64>,
    pub split: Option<String>,
}

/// Full breakdown of a single race.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceAnalysis {
    pub race_id: RaceId,
    pub regatta_name: String,
    pub regatta_date: NaiveDate,
    pub boat_class: String,
    pub event_name: String,
    pub results: Vec<ResultBreakdown>,
}

/// Analyze one race for the calling team.
///
/// A race that does not exist, or whose regatta belongs to another team,
/// is a not-found error (client error, not a server failure).
pub fn analyze_race(
    db: &RegattaDatabase,
    model: &dyn SpeedModel,
    team_id: TeamId,
    race_id: RaceId,
) -> Result<RaceAnalysis> {
    let (race, regatta) = db
        .get_race_with_regatta(race_id)?
        .ok_or(EngineError::RaceNotFound {
            race_id: race_id.as_i64(),
        })?;

    if regatta.team_id != team_id {
        return Err(EngineError::RaceNotFound {
            race_id: race_id.as_i64(),
        });
    }

    let results = db
        .get_results_for_race(race_id)?
        .into_iter()
        .map(|result| {
            let speed = usable_speed(model, &result, &race, &regatta);
            let team_name = if result.is_own_team {
                OWN_TEAM_LABEL.to_string()
            } else {
                result
                    .team_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string())
            };
            ResultBreakdown {
                team_name,
                is_own_team: result.is_own_team,
                place: result.place,
                finish_time_seconds: result.finish_time_seconds,
                speed,
                split: speed.map(|s| model.split(s)),
            }
        })
        .collect();

    Ok(RaceAnalysis {
        race_id,
        regatta_name: regatta.name,
        regatta_date: regatta.date,
        boat_class: race.boat_class,
        event_name: race.event_name,
        results,
    })
}
