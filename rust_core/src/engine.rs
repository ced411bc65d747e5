//! Engine facade.
//!
//! Wires the providers, cache, and pure ranking/simulation math together.
//! Fan-out to the stat and schedule providers is bounded by a semaphore so a
//! big league does not stampede upstream rate limits; every per-player
//! failure degrades to an exclusion instead of aborting the pass.

use crate::cache::ResultCache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::matchup::resolve_opponent;
use crate::providers::{LeagueRoster, RosterPlayer, RosterProvider, ScheduleProvider, StatsProvider};
use crate::ranking::rank_league;
use crate::roster::PlayerRecord;
use crate::simulation::{build_week_result, summarize};
use crate::stats::categories::fantasy_points_per_game;
use crate::stats::season::select_season;
use crate::types::{
    RankingEntry, ScoringSettings, SeasonWindow, TradeProposal, TradeSimulation,
};
use chrono::NaiveDate;
use futures_util::future::join_all;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Power-ranking and trade-simulation engine for one NBA season.
///
/// All collaborators are injected; the engine holds no global state beyond
/// the cache handle it was given.
pub struct FantasyEngine {
    stats: Arc<dyn StatsProvider>,
    schedule: Arc<dyn ScheduleProvider>,
    rosters: Arc<dyn RosterProvider>,
    cache: ResultCache,
    config: EngineConfig,
    window: SeasonWindow,
}

impl FantasyEngine {
    pub fn new(
        stats: Arc<dyn StatsProvider>,
        schedule: Arc<dyn ScheduleProvider>,
        rosters: Arc<dyn RosterProvider>,
        cache: ResultCache,
        window: SeasonWindow,
    ) -> Self {
        Self::with_config(stats, schedule, rosters, cache, window, EngineConfig::default())
    }

    pub fn with_config(
        stats: Arc<dyn StatsProvider>,
        schedule: Arc<dyn ScheduleProvider>,
        rosters: Arc<dyn RosterProvider>,
        cache: ResultCache,
        window: SeasonWindow,
        config: EngineConfig,
    ) -> Self {
        Self {
            stats,
            schedule,
            rosters,
            cache,
            config,
            window,
        }
    }

    /// Compute league-wide power rankings, rank-ascending.
    ///
    /// Results are cached per league; a stale-or-dead cache store only costs
    /// a recomputation.
    pub async fn compute_rankings(
        &self,
        league_id: &str,
        settings: &ScoringSettings,
    ) -> Result<Vec<RankingEntry>, EngineError> {
        let cache_key = ResultCache::rankings_key(league_id);
        if let Some(cached) = self.cache.get_json::<Vec<RankingEntry>>(&cache_key).await {
            debug!(league_id, "serving rankings from cache");
            return Ok(cached);
        }

        let league = self
            .rosters
            .rosters(league_id)
            .await
            .map_err(|e| EngineError::provider(league_id, "fetch rosters", e))?;
        if league.is_empty() {
            return Err(EngineError::NoRosters {
                league_id: league_id.to_string(),
            });
        }

        let records = self
            .fetch_player_records(league.iter().flat_map(|r| r.players.iter()))
            .await;

        let roster_inputs: Vec<(u64, Vec<String>)> = league
            .iter()
            .map(|r| {
                (
                    r.roster_id,
                    r.players.iter().map(|p| p.player_id.clone()).collect(),
                )
            })
            .collect();

        let entries = rank_league(&roster_inputs, &records, settings, &self.window, &self.config);
        info!(
            league_id,
            rosters = entries.len(),
            "computed league power rankings"
        );

        self.cache
            .put_json(
                &cache_key,
                &entries,
                Duration::from_secs(self.config.rankings_ttl_secs),
            )
            .await;
        Ok(entries)
    }

    /// Drop a league's cached rankings (e.g. after a roster move)
    pub async fn invalidate_rankings(&self, league_id: &str) {
        self.cache
            .invalidate(&ResultCache::rankings_key(league_id))
            .await;
    }

    /// Project a trade's effect over the next `weeks_ahead` matchup weeks.
    ///
    /// Each simulated week uses that week's actual scheduled opponent;
    /// opponents rotate, so the current opponent is irrelevant past week
    /// one. Weeks with no resolvable opponent are byes and are skipped.
    pub async fn simulate_trade(
        &self,
        league_id: &str,
        user_roster_id: u64,
        trade: &TradeProposal,
        weeks_ahead: u32,
        settings: &ScoringSettings,
    ) -> Result<TradeSimulation, EngineError> {
        let league = self
            .rosters
            .rosters(league_id)
            .await
            .map_err(|e| EngineError::provider(league_id, "fetch rosters", e))?;
        if league.is_empty() {
            return Err(EngineError::NoRosters {
                league_id: league_id.to_string(),
            });
        }

        let user = league
            .iter()
            .find(|r| r.roster_id == user_roster_id)
            .ok_or_else(|| EngineError::RosterNotFound {
                league_id: league_id.to_string(),
                roster_id: user_roster_id,
            })?;

        let current_week = self
            .rosters
            .current_week(league_id)
            .await
            .map_err(|e| EngineError::provider(league_id, "fetch current week", e))?;

        // Resolve every week's real opponent up front so the stat fetch can
        // cover all involved rosters in one bounded fan-out.
        let mut week_plans: Vec<(u32, u64)> = Vec::new();
        for week in (current_week + 1)..=(current_week + weeks_ahead) {
            match self.rosters.matchups(league_id, week).await {
                Ok(slots) => match resolve_opponent(&slots, user_roster_id) {
                    Some((opponent_id, _)) => week_plans.push((week, opponent_id)),
                    None => debug!(league_id, week, "bye week; skipping"),
                },
                Err(e) => {
                    warn!(league_id, week, error = %e, "matchup fetch failed; skipping week");
                }
            }
        }

        let by_id: FxHashMap<u64, &LeagueRoster> =
            league.iter().map(|r| (r.roster_id, r)).collect();
        let league_players: FxHashMap<&str, &RosterPlayer> = league
            .iter()
            .flat_map(|r| r.players.iter())
            .map(|p| (p.player_id.as_str(), p))
            .collect();

        let mut wanted: Vec<&RosterPlayer> = user.players.iter().collect();
        for (_, opponent_id) in &week_plans {
            if let Some(opponent) = by_id.get(opponent_id) {
                wanted.extend(opponent.players.iter());
            }
        }
        for player_id in &trade.players_in {
            match league_players.get(player_id.as_str()) {
                Some(player) => wanted.push(player),
                None => warn!(
                    league_id,
                    player_id = %player_id,
                    "incoming trade player not found in league; contributes nothing"
                ),
            }
        }

        let records = self.fetch_player_records(wanted.into_iter()).await;

        let user_ids: Vec<String> = user.players.iter().map(|p| p.player_id.clone()).collect();
        let mut traded_ids: Vec<String> = user_ids
            .iter()
            .filter(|id| !trade.players_out.contains(id))
            .cloned()
            .collect();
        for player_id in &trade.players_in {
            if !traded_ids.contains(player_id) {
                traded_ids.push(player_id.clone());
            }
        }

        let mut weeks = Vec::new();
        for (week, opponent_id) in week_plans {
            let (start, end) = match self.rosters.week_range(league_id, week).await {
                Ok(range) => range,
                Err(e) => {
                    warn!(league_id, week, error = %e, "week range lookup failed; skipping week");
                    continue;
                }
            };

            let opponent_ids: Vec<String> = by_id
                .get(&opponent_id)
                .map(|r| r.players.iter().map(|p| p.player_id.clone()).collect())
                .unwrap_or_default();

            let mut teams: FxHashSet<String> = FxHashSet::default();
            for id in user_ids
                .iter()
                .chain(traded_ids.iter())
                .chain(opponent_ids.iter())
            {
                if let Some(record) = records.get(id) {
                    if !record.status.is_sidelined() {
                        teams.insert(record.team.clone());
                    }
                }
            }
            let games_by_team = self.team_games_for_week(&teams, start, end).await;

            let points_without = self.week_points(&user_ids, &records, settings, &games_by_team);
            let points_with = self.week_points(&traded_ids, &records, settings, &games_by_team);
            let opponent_points =
                self.week_points(&opponent_ids, &records, settings, &games_by_team);

            weeks.push(build_week_result(
                week,
                opponent_id,
                points_without,
                points_with,
                opponent_points,
                self.config.sigmoid_k,
            ));
        }

        let simulation = summarize(weeks);
        info!(
            league_id,
            user_roster_id,
            weeks_simulated = simulation.summary.weeks_simulated,
            wins_improvement = simulation.summary.wins_improvement,
            "simulated trade"
        );
        Ok(simulation)
    }

    /// Fetch season stats for every unique player, bounded by the
    /// concurrency limit. A failed fetch leaves the record with no seasons,
    /// which the aggregator turns into a "no stats" exclusion.
    async fn fetch_player_records<'a, I>(&self, players: I) -> FxHashMap<String, PlayerRecord>
    where
        I: Iterator<Item = &'a RosterPlayer>,
    {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let unique: Vec<&RosterPlayer> = players
            .filter(|p| seen.insert(p.player_id.as_str()))
            .collect();

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_fetches));
        let futures = unique.into_iter().map(|player| {
            let semaphore = semaphore.clone();
            let stats = self.stats.clone();
            let player = player.clone();
            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");
                let seasons = match stats.fetch_season_stats(&player.player_id).await {
                    Ok(seasons) => seasons,
                    Err(e) => {
                        warn!(
                            player_id = %player.player_id,
                            provider = stats.provider_name(),
                            error = %e,
                            "season stat fetch failed; player will be excluded"
                        );
                        Vec::new()
                    }
                };
                (
                    player.player_id.clone(),
                    PlayerRecord {
                        player_id: player.player_id,
                        name: player.name,
                        team: player.team,
                        status: player.status,
                        seasons,
                    },
                )
            }
        });

        join_all(futures).await.into_iter().collect()
    }

    /// Scheduled game counts per team for one calendar window, fetched
    /// concurrently and cached per season/team/window.
    async fn team_games_for_week(
        &self,
        teams: &FxHashSet<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FxHashMap<String, u32> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_fetches));
        let ttl = Duration::from_secs(self.config.schedule_ttl_secs);
        let futures = teams.iter().map(|team| {
            let semaphore = semaphore.clone();
            let schedule = self.schedule.clone();
            let cache = self.cache.clone();
            let key = ResultCache::schedule_key(&self.window.current, team, start);
            let team = team.clone();
            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");
                if let Some(count) = cache.get_json::<u32>(&key).await {
                    return (team, count);
                }
                match schedule.games_in_range(&team, start, end).await {
                    Ok(count) => {
                        cache.put_json(&key, &count, ttl).await;
                        (team, count)
                    }
                    Err(e) => {
                        warn!(team = %team, error = %e, "schedule lookup failed; assuming zero games");
                        (team, 0)
                    }
                }
            }
        });

        join_all(futures).await.into_iter().collect()
    }

    /// Weekly projected total for one roster id set: per-game fantasy rate
    /// times that week's scheduled game count, active players only.
    fn week_points(
        &self,
        player_ids: &[String],
        records: &FxHashMap<String, PlayerRecord>,
        settings: &ScoringSettings,
        games_by_team: &FxHashMap<String, u32>,
    ) -> f64 {
        player_ids
            .iter()
            .take(self.config.max_players_to_analyze)
            .filter_map(|player_id| {
                let record = records.get(player_id)?;
                if record.status.is_sidelined() {
                    return None;
                }
                let selected =
                    select_season(&record.seasons, &self.window, self.config.min_games_threshold)?;
                let rate = fantasy_points_per_game(&selected.stats.per_game, settings);
                let games = games_by_team.get(&record.team).copied().unwrap_or(0);
                Some(rate * games as f64)
            })
            .sum()
    }
}
