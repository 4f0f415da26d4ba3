//! Database schema and connection management

use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Environment variable overriding the database location.
pub const DB_PATH_ENV_VAR: &str = "OARLOCK_DB";

/// Database connection manager for regatta records.
pub struct RegattaDatabase {
    pub(crate) conn: Connection,
}

impl RegattaDatabase {
    /// Open the database at the default location and ensure tables exist.
    pub fn new() -> Result<Self> {
        Self::open(&Self::database_path()?)
    }

    /// Open a database at an explicit path and ensure tables exist.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database, for tests and scratch work.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Resolve the database file path: `OARLOCK_DB`, else the platform
    /// data directory.
    fn database_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DB_PATH_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let data_dir = dirs::data_dir().ok_or(EngineError::DataDir)?;
        Ok(data_dir.join("oarlock").join("regattas.db"))
    }

    /// Initialize the database schema.
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS regattas (
                regatta_id INTEGER PRIMARY KEY,
                team_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                date TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS races (
                race_id INTEGER PRIMARY KEY,
                regatta_id INTEGER NOT NULL,
                boat_class TEXT NOT NULL,
                event_name TEXT NOT NULL,
                FOREIGN KEY (regatta_id) REFERENCES regattas(regatta_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS race_results (
                result_id INTEGER PRIMARY KEY,
                race_id INTEGER NOT NULL,
                is_own_team INTEGER NOT NULL,
                team_name TEXT,
                place INTEGER,
                finish_time_seconds REAL,
                FOREIGN KEY (race_id) REFERENCES races(race_id)
            )",
            [],
        )?;

        // name_key is the lowercased name; the unique constraint is what
        // makes lazy get-or-create race-free.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS external_teams (
                external_team_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                name_key TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        // season_key stores '' for the all-time scope: sqlite treats NULLs
        // as distinct inside unique keys, which would break the upsert.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS team_speed_estimates (
                team_id INTEGER NOT NULL,
                boat_class TEXT NOT NULL,
                season_key TEXT NOT NULL DEFAULT '',
                raw_speed REAL NOT NULL,
                adjusted_speed REAL NOT NULL,
                confidence_score REAL NOT NULL,
                sample_count INTEGER NOT NULL,
                last_calculated_at INTEGER NOT NULL,
                PRIMARY KEY (team_id, boat_class, season_key)
            )",
            [],
        )?;

        // Indexes for the join-heavy read paths
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_regatta_team_date
             ON regattas(team_id, date)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_race_regatta_class
             ON races(regatta_id, boat_class)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_result_race
             ON race_results(race_id)",
            [],
        )?;

        Ok(())
    }
}
