//! Oarlock — race-result aggregation and team speed rankings
//!
//! The numerical core of a rowing-team management platform. Coaches record
//! regattas, races and per-boat results; this crate turns that noisy
//! sample into comparable speeds and answers three questions: how fast is
//! our boat in a given class over time, how do we rank against the teams
//! we've raced, and how have we fared head-to-head against one opponent.
//!
//! ## Design
//!
//! - **Robust aggregation**: rankings run on the median speed of a group;
//!   the mean is kept for trend display only, so one corrupt time cannot
//!   move a team's rank.
//! - **Swappable normalization**: raw results become speeds through the
//!   [`speed::SpeedModel`] strategy trait, re-applied on every pass so a
//!   formula change needs no cache invalidation.
//! - **Explicit recomputation**: the only cross-request cache is one
//!   persisted estimate row per (team, boat class, season), rebuilt
//!   wholesale on each calculate call.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oarlock::engine::build_rankings;
//! use oarlock::speed::DistanceOverTime;
//! use oarlock::storage::RegattaDatabase;
//! use oarlock::TeamId;
//!
//! # fn example() -> oarlock::Result<()> {
//! let mut db = RegattaDatabase::new()?;
//! let model = DistanceOverTime::default();
//!
//! let rankings = build_rankings(&mut db, &model, TeamId::new(1), "8+", Some("Spring 2025"))?;
//! for entry in rankings {
//!     println!("{}. {} ({})", entry.rank, entry.team_name, entry.split);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Point the engine at a database file without passing `--db` everywhere:
//! ```bash
//! export OARLOCK_DB=/var/lib/oarlock/regattas.db
//! ```

pub mod commands;
pub mod engine;
pub mod error;
pub mod season;
pub mod server;
pub mod speed;
pub mod stats;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use storage::DB_PATH_ENV_VAR;
pub use types::{RaceId, RegattaId, ResultId, TeamId};
