//! League power ranking.
//!
//! A full recomputation every call: aggregate each roster, sort, assign
//! dense ranks, then express every category as a percentage of the league
//! maximum. Output is a pure function of the input snapshot.

use crate::config::EngineConfig;
use crate::roster::{aggregate_roster, PlayerRecord};
use crate::types::{Category, RankingEntry, RosterStats, ScoringSettings, SeasonWindow};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Rank aggregated rosters.
///
/// Stable descending sort on total points: equal totals keep their input
/// order, which makes the tie-break deterministic rather than an error.
/// Ranks are a dense 1..N sequence.
pub fn rank_rosters(mut rosters: Vec<RosterStats>) -> Vec<RankingEntry> {
    rosters.sort_by(|a, b| b.total_fantasy_points.total_cmp(&a.total_fantasy_points));

    let max_by_category = category_maxima(&rosters);

    rosters
        .into_iter()
        .enumerate()
        .map(|(idx, stats)| {
            let category_percentiles = max_by_category
                .iter()
                .map(|(cat, max_value)| {
                    let raw = stats.category_scores.get(cat).copied().unwrap_or(0.0);
                    let pct = if *max_value != 0.0 {
                        raw / max_value * 100.0
                    } else {
                        0.0
                    };
                    (*cat, pct)
                })
                .collect();

            RankingEntry {
                rank: (idx + 1) as u32,
                category_percentiles,
                stats,
            }
        })
        .collect()
}

/// League maximum raw score for every category observed on any roster.
///
/// A category nobody scored in at all defaults to 1 so the percentile
/// division stays defined.
fn category_maxima(rosters: &[RosterStats]) -> BTreeMap<Category, f64> {
    let mut maxima: BTreeMap<Category, f64> = BTreeMap::new();
    for roster in rosters {
        for (cat, value) in &roster.category_scores {
            maxima
                .entry(*cat)
                .and_modify(|max| {
                    if *value > *max {
                        *max = *value;
                    }
                })
                .or_insert(*value);
        }
    }
    for max in maxima.values_mut() {
        if max.is_nan() {
            *max = 1.0;
        }
    }
    maxima
}

/// Aggregate every roster and rank the league in one pass.
///
/// Roster aggregation is independent per roster, so it fans out across the
/// rayon pool; collection preserves input order before the stable sort.
pub fn rank_league(
    rosters: &[(u64, Vec<String>)],
    players: &FxHashMap<String, PlayerRecord>,
    settings: &ScoringSettings,
    window: &SeasonWindow,
    cfg: &EngineConfig,
) -> Vec<RankingEntry> {
    let stats: Vec<RosterStats> = rosters
        .par_iter()
        .map(|(roster_id, player_ids)| {
            aggregate_roster(*roster_id, player_ids, players, settings, window, cfg)
        })
        .collect();

    rank_rosters(stats)
}
