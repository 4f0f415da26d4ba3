//! ID newtypes for the record store.
//!
//! Sqlite rowids are i64; these wrappers keep team, regatta, race and
//! result identifiers from being mixed up in multi-entity joins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Type-safe wrapper for team IDs.
///
/// The caller's own team and opponent directory entries use separate
/// spaces; this type covers the owning team of regattas and estimates.
///
/// # Examples
///
/// ```rust
/// use oarlock::TeamId;
///
/// let team_id = TeamId::new(42);
/// assert_eq!(team_id.as_i64(), 42);
/// assert_eq!(team_id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(pub i64);

impl TeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse().map_err(|e| EngineError::InvalidParameter {
            name: "teamId",
            message: format!("{e}"),
        })?;
        Ok(Self(id))
    }
}

/// Type-safe wrapper for regatta IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegattaId(pub i64);

impl RegattaId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RegattaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for race IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RaceId(pub i64);

impl RaceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RaceId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse().map_err(|e| EngineError::InvalidParameter {
            name: "raceId",
            message: format!("{e}"),
        })?;
        Ok(Self(id))
    }
}

/// Type-safe wrapper for race-result IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultId(pub i64);

impl ResultId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
