//! Integration tests for the fantasy engine facade
//!
//! These tests drive `compute_rankings` and `simulate_trade` end-to-end
//! against in-memory fake providers, without external dependencies.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use courtside_rust_core::providers::{
    LeagueRoster, RosterPlayer, RosterProvider, ScheduleProvider, StatsProvider,
};
use courtside_rust_core::{
    Category, EngineError, ExclusionReason, FantasyEngine, InMemoryCacheStore, InjuryStatus,
    MatchupSlot, PerGameStats, PlayerSeasonStats, ResultCache, ScoringSettings, SeasonWindow,
    TradeProposal,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct FakeStatsProvider {
    seasons: HashMap<String, Vec<PlayerSeasonStats>>,
    fail_ids: Vec<String>,
}

#[async_trait]
impl StatsProvider for FakeStatsProvider {
    async fn fetch_season_stats(&self, player_id: &str) -> Result<Vec<PlayerSeasonStats>> {
        if self.fail_ids.iter().any(|id| id == player_id) {
            return Err(anyhow!("stats api timeout"));
        }
        Ok(self.seasons.get(player_id).cloned().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "fake-stats"
    }
}

struct FakeScheduleProvider {
    games_per_week: u32,
}

#[async_trait]
impl ScheduleProvider for FakeScheduleProvider {
    async fn games_in_range(
        &self,
        _team_code: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<u32> {
        Ok(self.games_per_week)
    }

    fn provider_name(&self) -> &str {
        "fake-schedule"
    }
}

#[derive(Default)]
struct FakeRosterProvider {
    rosters: Vec<LeagueRoster>,
    matchups_by_week: HashMap<u32, Vec<MatchupSlot>>,
    current_week: u32,
    roster_calls: AtomicUsize,
}

#[async_trait]
impl RosterProvider for FakeRosterProvider {
    async fn rosters(&self, _league_id: &str) -> Result<Vec<LeagueRoster>> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.rosters.clone())
    }

    async fn matchups(&self, _league_id: &str, week: u32) -> Result<Vec<MatchupSlot>> {
        Ok(self.matchups_by_week.get(&week).cloned().unwrap_or_default())
    }

    async fn current_week(&self, _league_id: &str) -> Result<u32> {
        Ok(self.current_week)
    }

    async fn week_range(&self, _league_id: &str, week: u32) -> Result<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::from_ymd_opt(2024, 10, 21).unwrap()
            + ChronoDuration::days(7 * week as i64);
        Ok((start, start + ChronoDuration::days(6)))
    }

    fn provider_name(&self) -> &str {
        "fake-platform"
    }
}

fn season(label: &str, games: u32, pts: f64, reb: f64) -> PlayerSeasonStats {
    PlayerSeasonStats {
        season: label.to_string(),
        games_played: games,
        per_game: PerGameStats {
            pts,
            reb,
            ..Default::default()
        },
    }
}

fn player(id: &str, team: &str, status: InjuryStatus) -> RosterPlayer {
    RosterPlayer {
        player_id: id.to_string(),
        name: format!("Player {}", id),
        team: team.to_string(),
        status,
    }
}

fn roster(id: u64, players: Vec<RosterPlayer>) -> LeagueRoster {
    LeagueRoster {
        roster_id: id,
        owner_id: format!("owner-{}", id),
        players,
    }
}

fn slot(roster_id: u64, matchup_id: u64) -> MatchupSlot {
    MatchupSlot {
        roster_id,
        matchup_id: Some(matchup_id),
        points: 0.0,
    }
}

/// Four-roster league with one current season of stats per player.
///
/// Roster 4 carries an Out player and a player whose stat fetch fails, so
/// both exclusion paths are exercised by every ranking pass.
fn league_fixture() -> (
    Arc<FakeStatsProvider>,
    Arc<FakeScheduleProvider>,
    Arc<FakeRosterProvider>,
) {
    let mut seasons = HashMap::new();
    seasons.insert("u1".to_string(), vec![season("2024-25", 40, 30.0, 5.0)]);
    seasons.insert("u2".to_string(), vec![season("2024-25", 40, 10.0, 0.0)]);
    seasons.insert("o1".to_string(), vec![season("2024-25", 40, 35.0, 12.0)]);
    seasons.insert("p1".to_string(), vec![season("2024-25", 40, 45.0, 0.0)]);
    seasons.insert("x1".to_string(), vec![season("2024-25", 40, 20.0, 2.0)]);
    seasons.insert("x2".to_string(), vec![season("2024-25", 40, 50.0, 0.0)]);

    let stats = Arc::new(FakeStatsProvider {
        seasons,
        fail_ids: vec!["f1".to_string()],
    });
    let schedule = Arc::new(FakeScheduleProvider { games_per_week: 3 });

    let rosters = vec![
        roster(
            1,
            vec![
                player("u1", "BOS", InjuryStatus::Active),
                player("u2", "MIA", InjuryStatus::Active),
            ],
        ),
        roster(2, vec![player("o1", "DEN", InjuryStatus::Active)]),
        roster(3, vec![player("p1", "LAL", InjuryStatus::Active)]),
        roster(
            4,
            vec![
                player("x1", "GSW", InjuryStatus::Active),
                player("x2", "PHX", InjuryStatus::Out),
                player("f1", "NYK", InjuryStatus::Active),
            ],
        ),
    ];

    // Opponents rotate: roster 1 faces roster 2 in week 6 and roster 3 in
    // week 7, then sits out week 8.
    let mut matchups_by_week = HashMap::new();
    matchups_by_week.insert(6, vec![slot(1, 61), slot(2, 61), slot(3, 62), slot(4, 62)]);
    matchups_by_week.insert(7, vec![slot(1, 71), slot(3, 71), slot(2, 72), slot(4, 72)]);
    matchups_by_week.insert(8, vec![slot(2, 81), slot(3, 81)]);

    let platform = Arc::new(FakeRosterProvider {
        rosters,
        matchups_by_week,
        current_week: 5,
        roster_calls: AtomicUsize::new(0),
    });

    (stats, schedule, platform)
}

fn engine(
    stats: Arc<FakeStatsProvider>,
    schedule: Arc<FakeScheduleProvider>,
    platform: Arc<FakeRosterProvider>,
    cache: ResultCache,
) -> FantasyEngine {
    FantasyEngine::new(
        stats,
        schedule,
        platform,
        cache,
        SeasonWindow::new("2024-25", "2023-24"),
    )
}

fn points_and_rebounds() -> ScoringSettings {
    ScoringSettings::from_codes([("pts", 1.0), ("reb", 1.2)]).unwrap()
}

#[tokio::test]
async fn test_rankings_sorted_descending_with_dense_ranks() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let entries = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .expect("ranking should succeed");

    assert_eq!(entries.len(), 4);
    let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert!(entries
        .windows(2)
        .all(|w| w[0].stats.total_fantasy_points >= w[1].stats.total_fantasy_points));

    // Season totals: roster 2 leads on rebounds weight, roster 4 trails with
    // two of its three players excluded.
    let ids: Vec<u64> = entries.iter().map(|e| e.stats.roster_id).collect();
    assert_eq!(ids, vec![2, 1, 3, 4]);
}

#[tokio::test]
async fn test_every_category_has_exactly_one_roster_at_100() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let entries = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .expect("ranking should succeed");

    for cat in [Category::Points, Category::Rebounds] {
        let at_max = entries
            .iter()
            .filter(|e| (e.category_percentiles[&cat] - 100.0).abs() < 1e-9)
            .count();
        assert_eq!(at_max, 1, "category {:?}", cat);
        assert!(entries
            .iter()
            .all(|e| (0.0..=100.0).contains(&e.category_percentiles[&cat])));
    }
}

#[tokio::test]
async fn test_provider_failures_degrade_to_exclusions() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let entries = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .expect("one bad stat fetch must not abort the pass");

    let roster4 = entries
        .iter()
        .find(|e| e.stats.roster_id == 4)
        .expect("roster 4 present");
    assert_eq!(roster4.stats.active_player_count, 1);
    assert_eq!(roster4.stats.excluded_players.len(), 2);

    let reasons: Vec<&ExclusionReason> = roster4
        .stats
        .excluded_players
        .iter()
        .map(|e| &e.reason)
        .collect();
    assert!(reasons
        .iter()
        .any(|r| matches!(r, ExclusionReason::Injured { .. })));
    assert!(reasons.iter().any(|r| matches!(r, ExclusionReason::NoStats)));
}

#[tokio::test]
async fn test_all_out_roster_scores_zero() {
    let mut seasons = HashMap::new();
    seasons.insert("a".to_string(), vec![season("2024-25", 40, 25.0, 0.0)]);
    seasons.insert("b".to_string(), vec![season("2024-25", 40, 15.0, 0.0)]);
    seasons.insert("c".to_string(), vec![season("2024-25", 40, 30.0, 0.0)]);
    let stats = Arc::new(FakeStatsProvider {
        seasons,
        fail_ids: vec![],
    });
    let schedule = Arc::new(FakeScheduleProvider { games_per_week: 3 });
    let platform = Arc::new(FakeRosterProvider {
        rosters: vec![
            roster(
                1,
                vec![
                    player("a", "BOS", InjuryStatus::Out),
                    player("b", "MIA", InjuryStatus::InjuredReserve),
                ],
            ),
            roster(2, vec![player("c", "DEN", InjuryStatus::Active)]),
        ],
        ..Default::default()
    });
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let entries = engine
        .compute_rankings("league-1", &settings)
        .await
        .expect("ranking should succeed");

    let empty = entries.iter().find(|e| e.stats.roster_id == 1).unwrap();
    assert_eq!(empty.stats.total_fantasy_points, 0.0);
    assert_eq!(empty.stats.active_player_count, 0);
    assert_eq!(empty.stats.excluded_players.len(), 2);
    assert_eq!(empty.rank, 2);
}

#[tokio::test]
async fn test_small_sample_uses_previous_rates_scaled_by_current_games() {
    let mut seasons = HashMap::new();
    seasons.insert(
        "vet".to_string(),
        vec![
            season("2024-25", 10, 8.0, 0.0),
            season("2023-24", 70, 20.0, 0.0),
        ],
    );
    let stats = Arc::new(FakeStatsProvider {
        seasons,
        fail_ids: vec![],
    });
    let schedule = Arc::new(FakeScheduleProvider { games_per_week: 3 });
    let platform = Arc::new(FakeRosterProvider {
        rosters: vec![roster(1, vec![player("vet", "BOS", InjuryStatus::Active)])],
        ..Default::default()
    });
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let entries = engine
        .compute_rankings("league-1", &settings)
        .await
        .expect("ranking should succeed");

    // Last season's 20 pts/game scaled by the 10 games actually played
    let entry = &entries[0];
    assert!((entry.stats.total_fantasy_points - 200.0).abs() < 1e-9);
    let contribution = &entry.stats.player_breakdown[0];
    assert_eq!(contribution.season_used, "2023-24");
    assert_eq!(contribution.games_played, 10);
}

#[tokio::test]
async fn test_rankings_are_idempotent_on_identical_snapshots() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let first = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .unwrap();
    let second = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_rankings_served_from_cache_until_invalidated() {
    let (stats, schedule, platform) = league_fixture();
    let cache = ResultCache::new(Arc::new(InMemoryCacheStore::new()));
    let engine = engine(stats, schedule, platform.clone(), cache);

    let first = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .unwrap();
    let second = engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(platform.roster_calls.load(Ordering::SeqCst), 1);

    engine.invalidate_rankings("league-1").await;
    engine
        .compute_rankings("league-1", &points_and_rebounds())
        .await
        .unwrap();
    assert_eq!(platform.roster_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_league_is_a_hard_error() {
    let stats = Arc::new(FakeStatsProvider::default());
    let schedule = Arc::new(FakeScheduleProvider { games_per_week: 3 });
    let platform = Arc::new(FakeRosterProvider::default());
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let result = engine.compute_rankings("league-1", &settings).await;
    assert!(matches!(result, Err(EngineError::NoRosters { .. })));
}

#[tokio::test]
async fn test_trade_simulation_uses_each_weeks_scheduled_opponent() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let trade = TradeProposal {
        players_out: vec!["u2".to_string()],
        players_in: vec!["x1".to_string()],
    };
    let sim = engine
        .simulate_trade("league-1", 1, &trade, 2, &settings)
        .await
        .expect("simulation should succeed");

    assert_eq!(sim.weeks.len(), 2);
    assert_eq!(sim.weeks[0].week, 6);
    assert_eq!(sim.weeks[0].opponent_roster_id, 2);
    assert_eq!(sim.weeks[1].week, 7);
    assert_eq!(sim.weeks[1].opponent_roster_id, 3);

    // 3 games each: without = (30+10)*3, with = (30+20)*3
    for week in &sim.weeks {
        assert!((week.projected_points_without_trade - 120.0).abs() < 1e-9);
        assert!((week.projected_points_with_trade - 150.0).abs() < 1e-9);
    }
    assert!((sim.weeks[0].opponent_projected_points - 105.0).abs() < 1e-9);
    assert!((sim.weeks[1].opponent_projected_points - 135.0).abs() < 1e-9);

    // Week 7 flips from a loss to a win with the trade
    assert_eq!(sim.summary.total_wins_without, 1);
    assert_eq!(sim.summary.total_wins_with, 2);
    assert_eq!(sim.summary.wins_improvement, 1);
    assert_eq!(sim.summary.weeks_simulated, 2);

    assert!(sim.weeks[0].win_probability_without > 50.0);
    assert!(sim.weeks[1].win_probability_without < 50.0);
    assert!(sim.weeks[1].win_probability_with > 50.0);
}

#[tokio::test]
async fn test_bye_weeks_are_skipped_not_counted() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    // Weeks 6..=8; roster 1 has no pairing in week 8
    let sim = engine
        .simulate_trade("league-1", 1, &TradeProposal::default(), 3, &settings)
        .await
        .expect("simulation should succeed");

    assert_eq!(sim.weeks.len(), 2);
    assert!(sim.weeks.iter().all(|w| w.week != 8));
    assert_eq!(sim.summary.weeks_simulated, 2);
}

#[tokio::test]
async fn test_no_op_trade_changes_nothing() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let sim = engine
        .simulate_trade("league-1", 1, &TradeProposal::default(), 2, &settings)
        .await
        .unwrap();

    for week in &sim.weeks {
        assert_eq!(
            week.projected_points_without_trade,
            week.projected_points_with_trade
        );
        assert_eq!(week.win_probability_without, week.win_probability_with);
    }
    assert_eq!(sim.summary.wins_improvement, 0);
}

#[tokio::test]
async fn test_unknown_roster_is_reported_with_context() {
    let (stats, schedule, platform) = league_fixture();
    let engine = engine(stats, schedule, platform, ResultCache::disabled());

    let settings = ScoringSettings::from_codes([("pts", 1.0)]).unwrap();
    let result = engine
        .simulate_trade("league-1", 99, &TradeProposal::default(), 2, &settings)
        .await;
    assert!(matches!(
        result,
        Err(EngineError::RosterNotFound { roster_id: 99, .. })
    ));
}
