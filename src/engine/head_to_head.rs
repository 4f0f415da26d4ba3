//! Pairwise race history against one named opponent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::season;
use crate::storage::{RaceResult, RegattaDatabase};
use crate::{RaceId, TeamId};

/// One race in which both crews have a recorded result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub race_id: RaceId,
    pub regatta_name: String,
    pub regatta_date: NaiveDate,
    pub event_name: String,
    pub own_place: Option<u32>,
    pub their_place: Option<u32>,
    pub own_time: Option<f64>,
    pub their_time: Option<f64>,
    /// Opponent time minus own time; positive means own team was faster.
    /// Undefined unless both finish times are present.
    pub margin: Option<f64>,
    pub won: bool,
}

/// Aggregated head-to-head record against one opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub opponent: String,
    pub total_races: usize,
    pub wins: usize,
    pub losses: usize,
    /// Mean margin over matchups where the margin is defined; `None` when
    /// no matchup has both times.
    pub avg_margin: Option<f64>,
    /// Most recent first.
    pub matchups: Vec<Matchup>,
}

/// Build the head-to-head history for one boat class against one opponent,
/// matched case-insensitively on the stored result label.
///
/// Races missing either crew's result are skipped entirely rather than
/// reported as partial matchups. Placement order beats the time margin
/// when both places are present: places reflect the full field, which a
/// two-party margin cannot.
pub fn build_head_to_head(
    db: &RegattaDatabase,
    team_id: TeamId,
    opponent: &str,
    boat_class: &str,
    season: Option<&str>,
) -> Result<HeadToHead> {
    let window = season::resolve(season);
    let races = db.load_scored_races(team_id, boat_class, window.as_ref())?;

    let mut matchups = Vec::new();
    for scored in &races {
        let own = scored.results.iter().find(|r| r.is_own_team);
        let theirs = scored.results.iter().find(|r| is_opponent(r, opponent));
        let (Some(own), Some(theirs)) = (own, theirs) else {
            continue;
        };

        let margin = match (theirs.finish_time_seconds, own.finish_time_seconds) {
            (Some(their_time), Some(own_time)) => Some(their_time - own_time),
            _ => None,
        };

        let won = match (own.place, theirs.place) {
            (Some(own_place), Some(their_place)) => own_place < their_place,
            _ => margin.map_or(false, |m| m > 0.0),
        };

        matchups.push(Matchup {
            race_id: scored.race.race_id,
            regatta_name: scored.regatta.name.clone(),
            regatta_date: scored.regatta.date,
            event_name: scored.race.event_name.clone(),
            own_place: own.place,
            their_place: theirs.place,
            own_time: own.finish_time_seconds,
            their_time: theirs.finish_time_seconds,
            margin,
            won,
        });
    }

    matchups.sort_by(|a, b| b.regatta_date.cmp(&a.regatta_date));

    let wins = matchups.iter().filter(|m| m.won).count();
    let margins: Vec<f64> = matchups.iter().filter_map(|m| m.margin).collect();
    let avg_margin = if margins.is_empty() {
        None
    } else {
        Some(margins.iter().sum::<f64>() / margins.len() as f64)
    };

    Ok(HeadToHead {
        opponent: opponent.to_string(),
        total_races: matchups.len(),
        wins,
        losses: matchups.len() - wins,
        avg_margin,
        matchups,
    })
}

fn is_opponent(result: &RaceResult, opponent: &str) -> bool {
    !result.is_own_team
        && result
            .team_name
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(opponent))
}
