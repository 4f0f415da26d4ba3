//! Data models for the storage layer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{RaceId, RegattaId, ResultId, TeamId};

/// A dated competition event owned by one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Regatta {
    pub regatta_id: RegattaId,
    pub team_id: TeamId,
    pub name: String,
    pub date: NaiveDate,
}

/// Fields for a regatta not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegatta {
    pub team_id: TeamId,
    pub name: String,
    pub date: NaiveDate,
}

/// One event within a regatta; the boat class scopes comparability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub race_id: RaceId,
    pub regatta_id: RegattaId,
    pub boat_class: String,
    pub event_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRace {
    pub regatta_id: RegattaId,
    pub boat_class: String,
    pub event_name: String,
}

/// One competing crew's result in a race, own team or opponent.
///
/// `team_name` labels opponents and is ignored for own-team rows. At most
/// one own-team result per race is assumed but never enforced; readers
/// treat a missing own result as "no comparison possible".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    pub result_id: ResultId,
    pub race_id: RaceId,
    pub is_own_team: bool,
    pub team_name: Option<String>,
    pub place: Option<u32>,
    pub finish_time_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRaceResult {
    pub race_id: RaceId,
    pub is_own_team: bool,
    pub team_name: Option<String>,
    pub place: Option<u32>,
    pub finish_time_seconds: Option<f64>,
}

/// Directory entry for an opponent, keyed by case-insensitive name.
///
/// Created once on first sighting; metadata is never merged afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalTeam {
    pub external_team_id: i64,
    /// Name as first seen, original casing.
    pub name: String,
    /// Lowercased unique key.
    pub name_key: String,
    pub created_at: i64,
}

/// Cached speed estimate for one (team, boat class, season) scope.
///
/// Fully derivable from race results; rebuilt wholesale on each calculate
/// call, never incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSpeedEstimate {
    pub team_id: TeamId,
    pub boat_class: String,
    /// `None` is the all-time scope.
    pub season: Option<String>,
    /// Mean speed, trend display only.
    pub raw_speed: f64,
    /// Median speed; drives all ranking and comparison.
    pub adjusted_speed: f64,
    pub confidence_score: f64,
    pub sample_count: u32,
    pub last_calculated_at: i64,
}

/// A race joined with its parent regatta and all of its results, as the
/// ranking and head-to-head builders consume it.
#[derive(Debug, Clone)]
pub struct ScoredRace {
    pub regatta: Regatta,
    pub race: Race,
    pub results: Vec<RaceResult>,
}
