//! Collaborator abstractions for external data sources
//!
//! Defines the provider traits the engine consumes. Implementations live in
//! the surrounding application (NBA stats API, fantasy platform API); the
//! core only sees already-normalized records. Constructors take these as
//! trait objects, so there are no process-wide singletons to reach through.

use crate::types::{InjuryStatus, MatchupSlot, PlayerSeasonStats};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-player season statistics source.
///
/// A failed or empty fetch is not an engine error: the player degrades to a
/// "no stats" exclusion at the roster level.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// All seasons of per-game averages available for one player
    async fn fetch_season_stats(&self, player_id: &str) -> Result<Vec<PlayerSeasonStats>>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}

/// Real-world NBA schedule source
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    /// Number of games a team plays in the inclusive date range
    async fn games_in_range(&self, team_code: &str, start: NaiveDate, end: NaiveDate)
        -> Result<u32>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}

/// One player slot on a fantasy roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: String,
    pub name: String,
    /// NBA team tricode (e.g. "BOS"), used for schedule lookups
    pub team: String,
    pub status: InjuryStatus,
}

/// One fantasy roster as the platform reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueRoster {
    pub roster_id: u64,
    pub owner_id: String,
    pub players: Vec<RosterPlayer>,
}

/// Fantasy platform source: rosters, matchup pairings, and the league's
/// week calendar.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// All rosters in a league. An error here is systemic: no partial
    /// ranking is meaningful without rosters.
    async fn rosters(&self, league_id: &str) -> Result<Vec<LeagueRoster>>;

    /// Flat matchup records for one week
    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupSlot>>;

    /// The league's current matchup week number
    async fn current_week(&self, league_id: &str) -> Result<u32>;

    /// Calendar range covered by a fantasy week (inclusive)
    async fn week_range(&self, league_id: &str, week: u32) -> Result<(NaiveDate, NaiveDate)>;

    /// Provider name for logging and debugging
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_player_deserializes_platform_status_spellings() {
        let json = r#"{
            "player_id": "203999",
            "name": "Nikola Jokic",
            "team": "DEN",
            "status": "ACTIVE"
        }"#;
        let player: RosterPlayer = serde_json::from_str(json).unwrap();
        assert_eq!(player.status, InjuryStatus::Active);

        let json = r#"{
            "player_id": "1629029",
            "name": "Luka Doncic",
            "team": "LAL",
            "status": "INJURED_RESERVE"
        }"#;
        let player: RosterPlayer = serde_json::from_str(json).unwrap();
        assert!(player.status.is_sidelined());
    }
}
