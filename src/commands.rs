//! CLI command handlers: run one engine operation and print JSON.
//!
//! The HTTP surface is the primary consumer; these handlers exist so a
//! coach or an operator can query the same aggregations from a shell.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::engine;
use crate::speed::DistanceOverTime;
use crate::storage::RegattaDatabase;
use crate::TeamId;

fn open_db(db_path: Option<&PathBuf>) -> Result<RegattaDatabase> {
    match db_path {
        Some(path) => {
            RegattaDatabase::open(path).with_context(|| format!("opening {}", path.display()))
        }
        None => RegattaDatabase::new().context("opening default database"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle the boat-classes command.
pub fn handle_boat_classes(
    db_path: Option<&PathBuf>,
    team: TeamId,
    season: Option<&str>,
) -> Result<()> {
    let db = open_db(db_path)?;
    let classes = engine::boat_classes(&db, team, season)?;
    print_json(&classes)
}

/// Handle the rankings command.
pub fn handle_rankings(
    db_path: Option<&PathBuf>,
    team: TeamId,
    boat_class: &str,
    season: Option<&str>,
) -> Result<()> {
    let mut db = open_db(db_path)?;
    let model = DistanceOverTime::default();
    let rankings = engine::build_rankings(&mut db, &model, team, boat_class, season)?;
    print_json(&rankings)
}

/// Handle the head-to-head command.
pub fn handle_head_to_head(
    db_path: Option<&PathBuf>,
    team: TeamId,
    opponent: &str,
    boat_class: &str,
    season: Option<&str>,
) -> Result<()> {
    let db = open_db(db_path)?;
    let comparison = engine::build_head_to_head(&db, team, opponent, boat_class, season)?;
    print_json(&comparison)
}

/// Handle the calculate command.
pub fn handle_calculate(
    db_path: Option<&PathBuf>,
    team: TeamId,
    boat_class: &str,
    season: Option<&str>,
) -> Result<()> {
    let mut db = open_db(db_path)?;
    let model = DistanceOverTime::default();
    match engine::calculate_estimate(&mut db, &model, team, boat_class, season)? {
        Some(estimate) => print_json(&estimate),
        None => {
            println!("No valid results for this scope; no estimate stored.");
            Ok(())
        }
    }
}
