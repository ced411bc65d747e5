//! Systemic error taxonomy for the ranking and simulation engine.
//!
//! Per-entity problems (a player with no stats, a bye week) never surface
//! here; they degrade into exclusion entries or skipped weeks. This type
//! covers the failures for which no partial answer is meaningful.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The roster provider returned nothing for the league; no partial
    /// ranking is meaningful without rosters.
    #[error("league {league_id}: no rosters available")]
    NoRosters { league_id: String },

    #[error("league {league_id}: roster {roster_id} not found")]
    RosterNotFound { league_id: String, roster_id: u64 },

    #[error("unknown scoring category code '{0}'")]
    UnknownCategory(String),

    #[error("invalid season label '{0}' (expected YYYY-YY)")]
    InvalidSeasonLabel(String),

    /// A provider call failed at a scope where degradation is impossible
    /// (e.g. the roster list itself).
    #[error("{operation} failed for league {league_id}: {source}")]
    Provider {
        league_id: String,
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    pub fn provider(
        league_id: impl Into<String>,
        operation: &'static str,
        source: anyhow::Error,
    ) -> Self {
        Self::Provider {
            league_id: league_id.into(),
            operation,
            source,
        }
    }
}
