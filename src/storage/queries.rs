//! Record store queries: inserts, loaders and the opponent directory.

use rusqlite::{params, OptionalExtension, Row};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{models::*, schema::RegattaDatabase};
use crate::error::{EngineError, Result};
use crate::season::SeasonWindow;
use crate::{RaceId, RegattaId, ResultId, TeamId};

impl RegattaDatabase {
    /// Record a regatta for a team.
    pub fn insert_regatta(&mut self, regatta: &NewRegatta) -> Result<RegattaId> {
        self.conn.execute(
            "INSERT INTO regattas (team_id, name, date) VALUES (?, ?, ?)",
            params![regatta.team_id.as_i64(), regatta.name, regatta.date],
        )?;
        Ok(RegattaId::new(self.conn.last_insert_rowid()))
    }

    /// Record a race within a regatta.
    pub fn insert_race(&mut self, race: &NewRace) -> Result<RaceId> {
        self.conn.execute(
            "INSERT INTO races (regatta_id, boat_class, event_name) VALUES (?, ?, ?)",
            params![
                race.regatta_id.as_i64(),
                race.boat_class,
                race.event_name
            ],
        )?;
        Ok(RaceId::new(self.conn.last_insert_rowid()))
    }

    /// Record one crew's result.
    ///
    /// A named opponent row also registers the opponent in the external
    /// team directory on first sighting.
    pub fn insert_result(&mut self, result: &NewRaceResult) -> Result<ResultId> {
        if !result.is_own_team {
            if let Some(name) = result.team_name.as_deref() {
                self.get_or_create_external_team(name)?;
            }
        }

        self.conn.execute(
            "INSERT INTO race_results
             (race_id, is_own_team, team_name, place, finish_time_seconds)
             VALUES (?, ?, ?, ?, ?)",
            params![
                result.race_id.as_i64(),
                result.is_own_team,
                result.team_name,
                result.place,
                result.finish_time_seconds
            ],
        )?;
        Ok(ResultId::new(self.conn.last_insert_rowid()))
    }

    /// Atomic get-or-create on the case-insensitive opponent directory.
    ///
    /// Insert-on-conflict-do-nothing then re-read, so two requests that
    /// sight the same new opponent concurrently cannot create duplicate
    /// rows. Metadata is set only at creation; an existing row wins with
    /// its original casing.
    pub fn get_or_create_external_team(&mut self, name: &str) -> Result<ExternalTeam> {
        let name_key = name.to_lowercase();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(EngineError::internal)?
            .as_secs() as i64;

        self.conn.execute(
            "INSERT INTO external_teams (name, name_key, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT(name_key) DO NOTHING",
            params![name, name_key, now],
        )?;

        let team = self
            .conn
            .query_row(
                "SELECT external_team_id, name, name_key, created_at
                 FROM external_teams WHERE name_key = ?",
                params![name_key],
                |row| {
                    Ok(ExternalTeam {
                        external_team_id: row.get(0)?,
                        name: row.get(1)?,
                        name_key: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )?;
        Ok(team)
    }

    /// Look up a directory entry without creating it.
    pub fn get_external_team(&self, name: &str) -> Result<Option<ExternalTeam>> {
        let team = self
            .conn
            .query_row(
                "SELECT external_team_id, name, name_key, created_at
                 FROM external_teams WHERE name_key = ?",
                params![name.to_lowercase()],
                |row| {
                    Ok(ExternalTeam {
                        external_team_id: row.get(0)?,
                        name: row.get(1)?,
                        name_key: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(team)
    }

    /// Load every race of one boat class in the team's own regattas, with
    /// parent regatta and all results, optionally season-windowed.
    ///
    /// Ordered by regatta date then race id so downstream grouping sees a
    /// deterministic input order.
    pub fn load_scored_races(
        &self,
        team_id: TeamId,
        boat_class: &str,
        window: Option<&SeasonWindow>,
    ) -> Result<Vec<ScoredRace>> {
        let mut query = String::from(
            "SELECT r.race_id, r.regatta_id, r.boat_class, r.event_name,
                    g.team_id, g.name, g.date
             FROM races r
             JOIN regattas g ON r.regatta_id = g.regatta_id
             WHERE g.team_id = ? AND r.boat_class = ?",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(team_id.as_i64()), Box::new(boat_class.to_string())];

        if let Some(w) = window {
            query.push_str(" AND g.date >= ? AND g.date <= ?");
            params.push(Box::new(w.start));
            params.push(Box::new(w.end));
        }

        query.push_str(" ORDER BY g.date, r.race_id");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| {
                let race = Race {
                    race_id: RaceId::new(row.get(0)?),
                    regatta_id: RegattaId::new(row.get(1)?),
                    boat_class: row.get(2)?,
                    event_name: row.get(3)?,
                };
                let regatta = Regatta {
                    regatta_id: race.regatta_id,
                    team_id: TeamId::new(row.get(4)?),
                    name: row.get(5)?,
                    date: row.get(6)?,
                };
                Ok((race, regatta))
            },
        )?;

        let mut races = Vec::new();
        for row in rows {
            let (race, regatta) = row?;
            let results = self.get_results_for_race(race.race_id)?;
            races.push(ScoredRace {
                regatta,
                race,
                results,
            });
        }
        Ok(races)
    }

    /// All results for one race, in insertion order.
    pub fn get_results_for_race(&self, race_id: RaceId) -> Result<Vec<RaceResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT result_id, race_id, is_own_team, team_name, place, finish_time_seconds
             FROM race_results
             WHERE race_id = ?
             ORDER BY result_id",
        )?;

        let rows = stmt.query_map(params![race_id.as_i64()], |row| self.row_to_result(row))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// One race with its parent regatta, or `None` if unknown.
    pub fn get_race_with_regatta(&self, race_id: RaceId) -> Result<Option<(Race, Regatta)>> {
        let pair = self
            .conn
            .query_row(
                "SELECT r.race_id, r.regatta_id, r.boat_class, r.event_name,
                        g.team_id, g.name, g.date
                 FROM races r
                 JOIN regattas g ON r.regatta_id = g.regatta_id
                 WHERE r.race_id = ?",
                params![race_id.as_i64()],
                |row| {
                    let race = Race {
                        race_id: RaceId::new(row.get(0)?),
                        regatta_id: RegattaId::new(row.get(1)?),
                        boat_class: row.get(2)?,
                        event_name: row.get(3)?,
                    };
                    let regatta = Regatta {
                        regatta_id: race.regatta_id,
                        team_id: TeamId::new(row.get(4)?),
                        name: row.get(5)?,
                        date: row.get(6)?,
                    };
                    Ok((race, regatta))
                },
            )
            .optional()?;
        Ok(pair)
    }

    /// Distinct boat classes with at least one own-team result for this
    /// team, optionally season-windowed. Keeps the UI from offering classes
    /// with no data behind them.
    pub fn own_boat_classes(
        &self,
        team_id: TeamId,
        window: Option<&SeasonWindow>,
    ) -> Result<Vec<String>> {
        let mut query = String::from(
            "SELECT DISTINCT r.boat_class
             FROM races r
             JOIN regattas g ON r.regatta_id = g.regatta_id
             JOIN race_results rr ON rr.race_id = r.race_id
             WHERE g.team_id = ? AND rr.is_own_team = 1",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(team_id.as_i64())];

        if let Some(w) = window {
            query.push_str(" AND g.date >= ? AND g.date <= ?");
            params.push(Box::new(w.start));
            params.push(Box::new(w.end));
        }

        query.push_str(" ORDER BY r.boat_class");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            |row| row.get::<_, String>(0),
        )?;

        let mut classes = Vec::new();
        for row in rows {
            classes.push(row?);
        }
        Ok(classes)
    }

    /// Helper to convert a database row to a RaceResult.
    pub(crate) fn row_to_result(&self, row: &Row) -> rusqlite::Result<RaceResult> {
        Ok(RaceResult {
            result_id: ResultId::new(row.get(0)?),
            race_id: RaceId::new(row.get(1)?),
            is_own_team: row.get(2)?,
            team_name: row.get(3)?,
            place: row.get(4)?,
            finish_time_seconds: row.get(5)?,
        })
    }
}
