//! Cross-team speed rankings over the caller's own regattas.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{estimate::calculate_estimate, OWN_TEAM_LABEL};
use crate::error::Result;
use crate::season;
use crate::speed::{usable_speed, SpeedModel};
use crate::stats;
use crate::storage::RegattaDatabase;
use crate::TeamId;

/// One ranked group in a boat-class leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub team_name: String,
    pub is_own_team: bool,
    /// Median speed across the group's valid samples; the ranking key.
    pub median_speed: f64,
    /// 500m split at the median speed.
    pub split: String,
    pub sample_count: usize,
    /// 2000m course time at the median speed.
    pub standard_time: String,
    /// Dense rank: sorted index + 1, no gaps, no shared ranks.
    pub rank: u32,
}

/// Build the leaderboard for one boat class, optionally season-windowed.
///
/// Own-team rows collapse under the literal "Your Team" label; opponent
/// rows group by their raw, case-sensitive stored name. That differs from
/// the case-insensitive opponent directory on purpose (see DESIGN.md).
/// Before ranking, the caller's own cached estimate for the same scope is
/// recomputed and stored; opponents only ever exist as on-the-fly groups.
pub fn build_rankings(
    db: &mut RegattaDatabase,
    model: &dyn SpeedModel,
    team_id: TeamId,
    boat_class: &str,
    season: Option<&str>,
) -> Result<Vec<RankingEntry>> {
    calculate_estimate(db, model, team_id, boat_class, season)?;

    let window = season::resolve(season);
    let races = db.load_scored_races(team_id, boat_class, window.as_ref())?;

    // Group valid speeds by display name, preserving first-seen order so
    // the later stable sort keeps tie order deterministic.
    let mut groups: Vec<(String, bool, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for scored in &races {
        for result in &scored.results {
            let Some(speed) = usable_speed(model, result, &scored.race, &scored.regatta) else {
                continue;
            };
            let name = if result.is_own_team {
                OWN_TEAM_LABEL
            } else {
                match result.team_name.as_deref() {
                    Some(name) => name,
                    // A non-own row with no label belongs to no group.
                    None => continue,
                }
            };

            match index.get(name) {
                Some(&i) => groups[i].2.push(speed),
                None => {
                    index.insert(name.to_string(), groups.len());
                    groups.push((name.to_string(), result.is_own_team, vec![speed]));
                }
            }
        }
    }

    let mut entries: Vec<RankingEntry> = groups
        .into_iter()
        .filter_map(|(name, is_own_team, speeds)| {
            let median_speed = stats::median(&speeds)?;
            Some(RankingEntry {
                team_name: name,
                is_own_team,
                median_speed,
                split: model.split(median_speed),
                sample_count: speeds.len(),
                standard_time: model.standard_time(median_speed),
                rank: 0,
            })
        })
        .collect();

    // Stable sort, descending by median; no secondary key so ties keep
    // input order.
    entries.sort_by(|a, b| {
        b.median_speed
            .partial_cmp(&a.median_speed)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = (i + 1) as u32;
    }

    Ok(entries)
}
