//! Boat-class discovery.

use crate::error::Result;
use crate::season;
use crate::storage::RegattaDatabase;
use crate::TeamId;

/// Distinct boat classes with at least one own-team result in scope.
///
/// A plain existence query, no aggregation.
pub fn boat_classes(
    db: &RegattaDatabase,
    team_id: TeamId,
    season: Option<&str>,
) -> Result<Vec<String>> {
    let window = season::resolve(season);
    db.own_boat_classes(team_id, window.as_ref())
}
