//! The aggregation engine: point-in-time estimates, cross-team rankings,
//! pairwise head-to-head histories and per-race breakdowns.
//!
//! Every operation is a request-scoped read-and-aggregate over the record
//! store; the only cross-request state is the persisted estimate row,
//! which is recomputed wholesale on every calculate call.

pub mod analyze;
pub mod classes;
pub mod estimate;
pub mod head_to_head;
pub mod ranking;

#[cfg(test)]
mod tests;

pub use analyze::{analyze_race, RaceAnalysis, ResultBreakdown};
pub use classes::boat_classes;
pub use estimate::calculate_estimate;
pub use head_to_head::{build_head_to_head, HeadToHead, Matchup};
pub use ranking::{build_rankings, RankingEntry};

/// Display label that all own-team rows collapse to in rankings and
/// breakdowns.
pub const OWN_TEAM_LABEL: &str = "Your Team";
