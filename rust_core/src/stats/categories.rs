//! Per-category fantasy point calculation.
//!
//! Maps per-game averages plus league scoring weights to per-category point
//! values. Output is per game; callers multiply by games played to get
//! season-to-date totals.

use crate::types::{Category, PerGameStats, ScoringSettings};
use std::collections::BTreeMap;

/// Probability weight credited per game when a player's averages qualify for
/// a double-double.
///
/// This is an estimate, not a count: exact double-double detection needs
/// game logs, which the per-game-average path does not carry. A player whose
/// averages put two of pts/reb/ast/stl/blk at 10+ is treated as producing
/// 0.3 double-doubles per game.
pub const DOUBLE_DOUBLE_RATE: f64 = 0.3;

/// Same estimate for triple-doubles (three categories at 10+)
pub const TRIPLE_DOUBLE_RATE: f64 = 0.1;

/// How many of the five counting categories average double digits
fn double_digit_count(s: &PerGameStats) -> usize {
    [s.pts, s.reb, s.ast, s.stl, s.blk]
        .iter()
        .filter(|v| **v >= 10.0)
        .count()
}

/// Raw (unweighted) per-game value of one category
fn raw_value(category: Category, s: &PerGameStats) -> f64 {
    match category {
        Category::Points => s.pts,
        Category::Rebounds => s.reb,
        Category::Assists => s.ast,
        Category::Steals => s.stl,
        Category::Blocks => s.blk,
        Category::Turnovers => s.tov,
        Category::FieldGoalsMade => s.fgm,
        Category::FieldGoalsAttempted => s.fga,
        Category::FreeThrowsMade => s.ftm,
        Category::FreeThrowsAttempted => s.fta,
        Category::ThreesMade => s.fg3m,
        Category::ThreesAttempted => s.fg3a,
        Category::DefensiveRebounds => s.dreb,
        Category::OffensiveRebounds => s.oreb,
        Category::PersonalFouls => s.pf,
        Category::PlusMinus => s.plus_minus,
        Category::FieldGoalsMissed => s.fga - s.fgm,
        Category::FreeThrowsMissed => s.fta - s.ftm,
        Category::ThreesMissed => s.fg3a - s.fg3m,
        Category::DoubleDoubles => {
            if double_digit_count(s) >= 2 {
                DOUBLE_DOUBLE_RATE
            } else {
                0.0
            }
        }
        Category::TripleDoubles => {
            if double_digit_count(s) >= 3 {
                TRIPLE_DOUBLE_RATE
            } else {
                0.0
            }
        }
    }
}

/// Weighted per-game points for every configured category.
///
/// Zero-weight categories appear in the map as explicit 0.0 entries so
/// downstream sums stay consistent with what consumers see.
pub fn category_points(
    per_game: &PerGameStats,
    settings: &ScoringSettings,
) -> BTreeMap<Category, f64> {
    settings
        .categories()
        .map(|(cat, weight)| {
            let value = if weight == 0.0 {
                0.0
            } else {
                raw_value(cat, per_game) * weight
            };
            (cat, value)
        })
        .collect()
}

/// Weighted sum across all categories, per game
pub fn fantasy_points_per_game(per_game: &PerGameStats, settings: &ScoringSettings) -> f64 {
    category_points(per_game, settings).values().sum()
}
