//! Season stat selection.
//!
//! Decides which season's per-game averages represent a player's current
//! production, and how many games to scale them by. The ordering of the
//! rules below is load-bearing: a small current-season sample borrows last
//! season's rates but keeps this season's game count, while a zero-game
//! current season falls through to older data entirely.

use crate::types::{PlayerSeasonStats, SeasonWindow};

/// The season record chosen for a player, plus how to scale it
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSeason<'a> {
    pub stats: &'a PlayerSeasonStats,
    /// Label of the season whose rates are used
    pub season_used: String,
    /// Games to multiply the per-game rates by for season-to-date totals.
    /// Not always `stats.games_played`: with a small current sample this is
    /// the current season's game count applied to last season's rates.
    pub games_multiplier: u32,
}

impl<'a> SelectedSeason<'a> {
    fn own_games(stats: &'a PlayerSeasonStats) -> Self {
        Self {
            stats,
            season_used: stats.season.clone(),
            games_multiplier: stats.games_played,
        }
    }
}

/// Pick the season record to score a player from.
///
/// Rules, first match wins:
/// 1. Current season at or above the games threshold: use it.
/// 2. Current season has a small sample (1..threshold games) and last season
///    was played: use last season's rates scaled by this season's games.
/// 3. Current season has games but last season is unusable: use it as-is.
/// 4. No playable current season, last season was played: use last season.
/// 5. Otherwise the most recent season with any games.
/// 6. Nothing playable: `None`; the caller excludes the player rather than
///    scoring a zero.
pub fn select_season<'a>(
    seasons: &'a [PlayerSeasonStats],
    window: &SeasonWindow,
    min_games_threshold: u32,
) -> Option<SelectedSeason<'a>> {
    let current = seasons.iter().find(|s| s.season == window.current);
    let previous = seasons.iter().find(|s| s.season == window.previous);
    let playable_previous = previous.filter(|p| p.games_played > 0);

    if let Some(cur) = current {
        if cur.games_played >= min_games_threshold {
            return Some(SelectedSeason::own_games(cur));
        }
        if cur.games_played > 0 {
            if let Some(prev) = playable_previous {
                // Small sample this year: last year's skill level, scaled by
                // how many games have actually happened.
                return Some(SelectedSeason {
                    stats: prev,
                    season_used: prev.season.clone(),
                    games_multiplier: cur.games_played,
                });
            }
            return Some(SelectedSeason::own_games(cur));
        }
    }

    if let Some(prev) = playable_previous {
        return Some(SelectedSeason::own_games(prev));
    }

    // "YYYY-YY" labels sort chronologically as strings
    seasons
        .iter()
        .filter(|s| s.games_played > 0)
        .max_by(|a, b| a.season.cmp(&b.season))
        .map(SelectedSeason::own_games)
}
