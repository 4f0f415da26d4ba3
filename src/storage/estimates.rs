//! Persistence for cached team speed estimates.
//!
//! One row per (team, boat class, season) natural key. Every write is a
//! full-row overwrite with a fresh timestamp, always preceded by a
//! wholesale recomputation from raw results; concurrent writers therefore
//! settle on "last self-consistent computation wins".

use rusqlite::{params, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{models::TeamSpeedEstimate, schema::RegattaDatabase};
use crate::error::{EngineError, Result};
use crate::TeamId;

/// Wire between `Option<String>` and the non-null `season_key` column.
fn season_key(season: Option<&str>) -> &str {
    season.unwrap_or("")
}

fn season_of(key: String) -> Option<String> {
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

impl RegattaDatabase {
    /// Overwrite (or create) the estimate row for a natural key.
    ///
    /// Idempotent given identical inputs apart from `last_calculated_at`.
    pub fn upsert_team_speed_estimate(
        &mut self,
        team_id: TeamId,
        boat_class: &str,
        season: Option<&str>,
        raw_speed: f64,
        adjusted_speed: f64,
        confidence_score: f64,
        sample_count: u32,
    ) -> Result<TeamSpeedEstimate> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(EngineError::internal)?
            .as_secs() as i64;

        self.conn.execute(
            "INSERT OR REPLACE INTO team_speed_estimates
             (team_id, boat_class, season_key, raw_speed, adjusted_speed,
              confidence_score, sample_count, last_calculated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                team_id.as_i64(),
                boat_class,
                season_key(season),
                raw_speed,
                adjusted_speed,
                confidence_score,
                sample_count,
                now
            ],
        )?;

        Ok(TeamSpeedEstimate {
            team_id,
            boat_class: boat_class.to_string(),
            season: season.map(str::to_string),
            raw_speed,
            adjusted_speed,
            confidence_score,
            sample_count,
            last_calculated_at: now,
        })
    }

    /// Read the cached estimate for a natural key, if one exists.
    pub fn get_team_speed_estimate(
        &self,
        team_id: TeamId,
        boat_class: &str,
        season: Option<&str>,
    ) -> Result<Option<TeamSpeedEstimate>> {
        let estimate = self
            .conn
            .query_row(
                "SELECT team_id, boat_class, season_key, raw_speed, adjusted_speed,
                        confidence_score, sample_count, last_calculated_at
                 FROM team_speed_estimates
                 WHERE team_id = ? AND boat_class = ? AND season_key = ?",
                params![team_id.as_i64(), boat_class, season_key(season)],
                |row| {
                    Ok(TeamSpeedEstimate {
                        team_id: TeamId::new(row.get(0)?),
                        boat_class: row.get(1)?,
                        season: season_of(row.get(2)?),
                        raw_speed: row.get(3)?,
                        adjusted_speed: row.get(4)?,
                        confidence_score: row.get(5)?,
                        sample_count: row.get(6)?,
                        last_calculated_at: row.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(estimate)
    }
}
