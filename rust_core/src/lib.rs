//! Courtside Core - fantasy basketball power rankings and trade simulation.
//!
//! This module provides:
//! - Season stat selection (which historical window represents a player's
//!   current production)
//! - Per-category fantasy scoring with league-specific weights, including
//!   derived and estimated categories
//! - Roster aggregation with structured exclusion reasons
//! - League-wide power rankings with per-category percentiles
//! - Head-to-head matchup resolution from flat platform records
//! - Logistic win-probability projection of hypothetical trades over future
//!   scheduled opponents
//! - TTL result caching that degrades to recomputation when the store is
//!   unavailable

mod types;

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod matchup;
pub mod providers;
pub mod ranking;
pub mod roster;
pub mod simulation;
pub mod stats;

pub use cache::{CacheStore, InMemoryCacheStore, RedisCacheStore, ResultCache};
pub use config::EngineConfig;
pub use engine::FantasyEngine;
pub use error::EngineError;
pub use matchup::resolve_opponent;
pub use ranking::{rank_league, rank_rosters};
pub use roster::{aggregate_roster, PlayerRecord};
pub use simulation::{matchup_win_probability, win_probability_pct};
pub use types::*;
