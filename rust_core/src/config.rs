//! Engine configuration and defaults.
//!
//! All knobs have compile-time defaults and can be overridden from the
//! environment; nothing here is required for the engine to run.

use std::env;

/// Minimum games in the current season before its averages are trusted over
/// last season's
pub const DEFAULT_MIN_GAMES_THRESHOLD: u32 = 25;

/// How many roster slots are analyzed per roster (stable order as given)
pub const DEFAULT_MAX_PLAYERS_TO_ANALYZE: usize = 13;

/// Logistic slope converting a weekly point differential into a win
/// probability
pub const DEFAULT_SIGMOID_K: f64 = 0.05;

/// Upper bound on concurrent per-player provider calls within one pass
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// TTL for cached league rankings
pub const DEFAULT_RANKINGS_TTL_SECS: u64 = 300;

/// TTL for cached schedule game counts
pub const DEFAULT_SCHEDULE_TTL_SECS: u64 = 3600;

/// Runtime configuration for the ranking and simulation engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub min_games_threshold: u32,
    pub max_players_to_analyze: usize,
    pub sigmoid_k: f64,
    pub max_concurrent_fetches: usize,
    pub rankings_ttl_secs: u64,
    pub schedule_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_games_threshold: DEFAULT_MIN_GAMES_THRESHOLD,
            max_players_to_analyze: DEFAULT_MAX_PLAYERS_TO_ANALYZE,
            sigmoid_k: DEFAULT_SIGMOID_K,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            rankings_ttl_secs: DEFAULT_RANKINGS_TTL_SECS,
            schedule_ttl_secs: DEFAULT_SCHEDULE_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let min_games_threshold = env::var("MIN_GAMES_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MIN_GAMES_THRESHOLD);

        let max_players_to_analyze = env::var("MAX_PLAYERS_TO_ANALYZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_PLAYERS_TO_ANALYZE)
            .max(1);

        let sigmoid_k = env::var("SIGMOID_K")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_SIGMOID_K)
            .clamp(0.001, 1.0);

        let max_concurrent_fetches = env::var("MAX_CONCURRENT_FETCHES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES)
            .clamp(1, 64);

        let rankings_ttl_secs = env::var("RANKINGS_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RANKINGS_TTL_SECS);

        let schedule_ttl_secs = env::var("SCHEDULE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SCHEDULE_TTL_SECS);

        Self {
            min_games_threshold,
            max_players_to_analyze,
            sigmoid_k,
            max_concurrent_fetches,
            rankings_ttl_secs,
            schedule_ttl_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.min_games_threshold, 25);
        assert_eq!(cfg.max_players_to_analyze, 13);
        assert!((cfg.sigmoid_k - 0.05).abs() < f64::EPSILON);
    }
}
