//! Roster aggregation.
//!
//! Folds per-player outcomes into a `RosterStats`: every player either
//! contributes season-to-date category totals or lands in the exclusion list
//! with a structured reason. A bad player never aborts the roster.

use crate::config::EngineConfig;
use crate::stats::categories::category_points;
use crate::stats::season::select_season;
use crate::types::{
    ExcludedPlayer, ExclusionReason, InjuryStatus, PlayerContribution, PlayerSeasonStats,
    RosterStats, ScoringSettings, SeasonWindow,
};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the aggregator knows about one player: roster metadata merged
/// with whatever the stats provider returned (empty seasons when the fetch
/// failed — that degrades to a `NoStats` exclusion here).
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name: String,
    /// NBA team tricode, used for schedule lookups
    pub team: String,
    pub status: InjuryStatus,
    pub seasons: Vec<PlayerSeasonStats>,
}

/// Tagged per-player result the aggregator folds
enum PlayerOutcome {
    Included(PlayerContribution),
    Excluded(ExcludedPlayer),
}

fn score_player(
    record: &PlayerRecord,
    settings: &ScoringSettings,
    window: &SeasonWindow,
    cfg: &EngineConfig,
) -> PlayerOutcome {
    if record.status.is_sidelined() {
        return PlayerOutcome::Excluded(ExcludedPlayer {
            player_id: record.player_id.clone(),
            name: record.name.clone(),
            reason: ExclusionReason::Injured {
                status: record.status,
            },
        });
    }

    let Some(selected) = select_season(&record.seasons, window, cfg.min_games_threshold) else {
        return PlayerOutcome::Excluded(ExcludedPlayer {
            player_id: record.player_id.clone(),
            name: record.name.clone(),
            reason: ExclusionReason::NoStats,
        });
    };

    // Per-game rates scaled to season-to-date totals: actual accumulated
    // value, not a projection.
    let games = selected.games_multiplier;
    let mut category_totals: BTreeMap<_, _> = category_points(&selected.stats.per_game, settings);
    for value in category_totals.values_mut() {
        *value *= games as f64;
    }
    let total_points: f64 = category_totals.values().sum();

    PlayerOutcome::Included(PlayerContribution {
        player_id: record.player_id.clone(),
        name: record.name.clone(),
        season_used: selected.season_used,
        games_played: games,
        total_points,
        category_points: category_totals,
    })
}

/// Aggregate one roster's season-to-date fantasy production.
///
/// The first `cfg.max_players_to_analyze` ids are scored in the order given;
/// ids past that are ignored entirely (not excluded, not counted).
pub fn aggregate_roster(
    roster_id: u64,
    player_ids: &[String],
    players: &FxHashMap<String, PlayerRecord>,
    settings: &ScoringSettings,
    window: &SeasonWindow,
    cfg: &EngineConfig,
) -> RosterStats {
    let mut category_scores: BTreeMap<_, f64> =
        settings.categories().map(|(c, _)| (c, 0.0)).collect();
    let mut breakdown = Vec::new();
    let mut excluded = Vec::new();

    for player_id in player_ids.iter().take(cfg.max_players_to_analyze) {
        let outcome = match players.get(player_id) {
            Some(record) => score_player(record, settings, window, cfg),
            None => PlayerOutcome::Excluded(ExcludedPlayer {
                player_id: player_id.clone(),
                name: player_id.clone(),
                reason: ExclusionReason::NotFound,
            }),
        };

        match outcome {
            PlayerOutcome::Included(contribution) => {
                for (cat, value) in &contribution.category_points {
                    *category_scores.entry(*cat).or_insert(0.0) += value;
                }
                breakdown.push(contribution);
            }
            PlayerOutcome::Excluded(exclusion) => {
                debug!(
                    roster_id,
                    player_id = %exclusion.player_id,
                    reason = %exclusion.reason,
                    "excluding player from roster aggregate"
                );
                excluded.push(exclusion);
            }
        }
    }

    // Transparency ordering only; ranking logic never reads this
    breakdown.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));

    let total_fantasy_points = category_scores.values().sum();
    let active_player_count = breakdown.len();

    RosterStats {
        roster_id,
        total_fantasy_points,
        category_scores,
        player_breakdown: breakdown,
        active_player_count,
        excluded_players: excluded,
    }
}
