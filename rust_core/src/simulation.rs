//! Win probability projection.
//!
//! Converts weekly point differentials into win probabilities via a logistic
//! curve and folds per-week projections into a trade verdict. The async
//! orchestration (opponent resolution, schedule lookups) lives in the engine;
//! everything here is pure math over prepared inputs.

use crate::types::{SimulationSummary, SimulationWeekResult, TradeSimulation};

/// Logistic function for probability calculation
#[inline]
fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Win probability for a point differential, as a 0-100 percentage.
///
/// With the default slope k = 0.05, a +20 point edge is worth about 73%,
/// and the curve is symmetric: `P(d) + P(-d) == 100`.
pub fn win_probability_pct(point_diff: f64, k: f64) -> f64 {
    logistic(k * point_diff) * 100.0
}

/// Win probability of a projected weekly matchup.
///
/// A zero-point opponent projection means the logistic differential is
/// meaningless (an empty or fully sidelined roster), so the probability is
/// pinned: 100 when we project anything at all, 50 when both sides are zero.
pub fn matchup_win_probability(own_points: f64, opponent_points: f64, k: f64) -> f64 {
    if opponent_points == 0.0 {
        return if own_points > 0.0 { 100.0 } else { 50.0 };
    }
    win_probability_pct(own_points - opponent_points, k)
}

/// Assemble one simulated week from the three projected totals
pub fn build_week_result(
    week: u32,
    opponent_roster_id: u64,
    points_without_trade: f64,
    points_with_trade: f64,
    opponent_points: f64,
    k: f64,
) -> SimulationWeekResult {
    SimulationWeekResult {
        week,
        opponent_roster_id,
        projected_points_without_trade: points_without_trade,
        projected_points_with_trade: points_with_trade,
        opponent_projected_points: opponent_points,
        win_probability_without: matchup_win_probability(points_without_trade, opponent_points, k),
        win_probability_with: matchup_win_probability(points_with_trade, opponent_points, k),
    }
}

/// Fold simulated weeks into the trade verdict.
///
/// A week counts as a win when the projected total strictly beats the
/// opponent's. Bye weeks never reach this function, so `weeks_simulated`
/// is simply the number of resolved weeks.
pub fn summarize(weeks: Vec<SimulationWeekResult>) -> TradeSimulation {
    let total_wins_without = weeks
        .iter()
        .filter(|w| w.projected_points_without_trade > w.opponent_projected_points)
        .count() as u32;
    let total_wins_with = weeks
        .iter()
        .filter(|w| w.projected_points_with_trade > w.opponent_projected_points)
        .count() as u32;

    let summary = SimulationSummary {
        total_wins_without,
        total_wins_with,
        wins_improvement: total_wins_with as i32 - total_wins_without as i32,
        weeks_simulated: weeks.len() as u32,
    };

    TradeSimulation { weeks, summary }
}
