// Shared models for the Courtside ranking and simulation core
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Scoring Categories
// ============================================================================

/// Closed set of scoring category codes.
///
/// Every category a league can weight is listed here; unknown codes are
/// rejected when `ScoringSettings` is built, so the rest of the engine never
/// sees a free-form category string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "pts")]
    Points,
    #[serde(rename = "reb")]
    Rebounds,
    #[serde(rename = "ast")]
    Assists,
    #[serde(rename = "stl")]
    Steals,
    #[serde(rename = "blk")]
    Blocks,
    #[serde(rename = "to", alias = "tov", alias = "turnover")]
    Turnovers,
    #[serde(rename = "fgm")]
    FieldGoalsMade,
    #[serde(rename = "fga")]
    FieldGoalsAttempted,
    #[serde(rename = "ftm")]
    FreeThrowsMade,
    #[serde(rename = "fta")]
    FreeThrowsAttempted,
    #[serde(rename = "fg3m", alias = "tpm")]
    ThreesMade,
    #[serde(rename = "fg3a", alias = "tpa")]
    ThreesAttempted,
    #[serde(rename = "dreb")]
    DefensiveRebounds,
    #[serde(rename = "oreb")]
    OffensiveRebounds,
    #[serde(rename = "pf")]
    PersonalFouls,
    #[serde(rename = "plus_minus", alias = "pm")]
    PlusMinus,
    #[serde(rename = "fgmi")]
    FieldGoalsMissed,
    #[serde(rename = "ftmi")]
    FreeThrowsMissed,
    #[serde(rename = "fg3mi", alias = "tpmi")]
    ThreesMissed,
    #[serde(rename = "dd")]
    DoubleDoubles,
    #[serde(rename = "td")]
    TripleDoubles,
}

impl Category {
    /// Canonical category code as leagues configure it
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Points => "pts",
            Category::Rebounds => "reb",
            Category::Assists => "ast",
            Category::Steals => "stl",
            Category::Blocks => "blk",
            Category::Turnovers => "to",
            Category::FieldGoalsMade => "fgm",
            Category::FieldGoalsAttempted => "fga",
            Category::FreeThrowsMade => "ftm",
            Category::FreeThrowsAttempted => "fta",
            Category::ThreesMade => "fg3m",
            Category::ThreesAttempted => "fg3a",
            Category::DefensiveRebounds => "dreb",
            Category::OffensiveRebounds => "oreb",
            Category::PersonalFouls => "pf",
            Category::PlusMinus => "plus_minus",
            Category::FieldGoalsMissed => "fgmi",
            Category::FreeThrowsMissed => "ftmi",
            Category::ThreesMissed => "fg3mi",
            Category::DoubleDoubles => "dd",
            Category::TripleDoubles => "td",
        }
    }

    /// Parse a league-supplied category code (accepts known aliases)
    pub fn parse(code: &str) -> Option<Category> {
        let code = code.trim().to_lowercase();
        let cat = match code.as_str() {
            "pts" => Category::Points,
            "reb" => Category::Rebounds,
            "ast" => Category::Assists,
            "stl" => Category::Steals,
            "blk" => Category::Blocks,
            "to" | "tov" | "turnover" => Category::Turnovers,
            "fgm" => Category::FieldGoalsMade,
            "fga" => Category::FieldGoalsAttempted,
            "ftm" => Category::FreeThrowsMade,
            "fta" => Category::FreeThrowsAttempted,
            "fg3m" | "tpm" => Category::ThreesMade,
            "fg3a" | "tpa" => Category::ThreesAttempted,
            "dreb" => Category::DefensiveRebounds,
            "oreb" => Category::OffensiveRebounds,
            "pf" => Category::PersonalFouls,
            "plus_minus" | "pm" => Category::PlusMinus,
            "fgmi" => Category::FieldGoalsMissed,
            "ftmi" => Category::FreeThrowsMissed,
            "fg3mi" | "tpmi" => Category::ThreesMissed,
            "dd" => Category::DoubleDoubles,
            "td" => Category::TripleDoubles,
            _ => return None,
        };
        Some(cat)
    }
}

/// Per-category scoring weights for one league.
///
/// Zero-weight categories are kept, not dropped: downstream output must show
/// them as explicit 0.0 entries so totals stay auditable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    weights: BTreeMap<Category, f64>,
}

impl ScoringSettings {
    /// Build from raw league configuration codes.
    ///
    /// Unknown codes are a hard error: a typo in league settings would
    /// otherwise silently zero a category.
    pub fn from_codes<'a, I>(codes: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut weights = BTreeMap::new();
        for (code, weight) in codes {
            let cat = Category::parse(code)
                .ok_or_else(|| EngineError::UnknownCategory(code.to_string()))?;
            weights.insert(cat, weight);
        }
        Ok(Self { weights })
    }

    pub fn from_weights(weights: BTreeMap<Category, f64>) -> Self {
        Self { weights }
    }

    /// Common points-league preset
    pub fn standard_points() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(Category::Points, 1.0);
        weights.insert(Category::Rebounds, 1.2);
        weights.insert(Category::Assists, 1.5);
        weights.insert(Category::Steals, 3.0);
        weights.insert(Category::Blocks, 3.0);
        weights.insert(Category::Turnovers, -1.0);
        Self { weights }
    }

    pub fn weight(&self, category: Category) -> f64 {
        self.weights.get(&category).copied().unwrap_or(0.0)
    }

    /// All configured categories in deterministic order, zero weights included
    pub fn categories(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.weights.iter().map(|(c, w)| (*c, *w))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }
}

// ============================================================================
// Player Stats
// ============================================================================

/// Per-game statistical rates for one player season
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerGameStats {
    #[serde(default)]
    pub pts: f64,
    #[serde(default)]
    pub reb: f64,
    #[serde(default)]
    pub ast: f64,
    #[serde(default)]
    pub stl: f64,
    #[serde(default)]
    pub blk: f64,
    #[serde(default)]
    pub tov: f64,
    #[serde(default)]
    pub fgm: f64,
    #[serde(default)]
    pub fga: f64,
    #[serde(default)]
    pub ftm: f64,
    #[serde(default)]
    pub fta: f64,
    #[serde(default)]
    pub fg3m: f64,
    #[serde(default)]
    pub fg3a: f64,
    #[serde(default)]
    pub dreb: f64,
    #[serde(default)]
    pub oreb: f64,
    #[serde(default)]
    pub pf: f64,
    #[serde(default)]
    pub plus_minus: f64,
}

/// One season of per-game averages for a player.
///
/// Immutable once fetched; identified by (player_id, season) upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    /// Season label, e.g. "2024-25"
    pub season: String,
    pub games_played: u32,
    pub per_game: PerGameStats,
}

/// Player availability as reported by the roster provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InjuryStatus {
    #[serde(alias = "active", alias = "HEALTHY")]
    Active,
    #[serde(rename = "DTD", alias = "DAY_TO_DAY", alias = "QUESTIONABLE")]
    DayToDay,
    #[serde(alias = "out", alias = "O")]
    Out,
    #[serde(rename = "IR", alias = "INJURY_RESERVE", alias = "INJURED_RESERVE")]
    InjuredReserve,
    #[serde(alias = "SUSPENDED")]
    Suspension,
}

impl InjuryStatus {
    /// True if the player cannot take the floor and must be zeroed out
    pub fn is_sidelined(&self) -> bool {
        matches!(
            self,
            InjuryStatus::Out | InjuryStatus::InjuredReserve | InjuryStatus::Suspension
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryStatus::Active => "ACTIVE",
            InjuryStatus::DayToDay => "DTD",
            InjuryStatus::Out => "OUT",
            InjuryStatus::InjuredReserve => "IR",
            InjuryStatus::Suspension => "SUSPENSION",
        }
    }
}

// ============================================================================
// Season Window
// ============================================================================

/// The pair of season labels the stat selector compares against.
///
/// Labels use the NBA "YYYY-YY" form, which sorts chronologically as plain
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub current: String,
    pub previous: String,
}

impl SeasonWindow {
    pub fn new(current: impl Into<String>, previous: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            previous: previous.into(),
        }
    }

    /// Derive the window from the current season label alone
    pub fn for_current(current: &str) -> Result<Self, EngineError> {
        let previous = previous_season_label(current)
            .ok_or_else(|| EngineError::InvalidSeasonLabel(current.to_string()))?;
        Ok(Self {
            current: current.to_string(),
            previous,
        })
    }
}

/// "2024-25" -> "2023-24". Returns None for labels not in YYYY-YY form.
pub fn previous_season_label(label: &str) -> Option<String> {
    let (start, _) = label.split_once('-')?;
    if start.len() != 4 {
        return None;
    }
    let start_year: i32 = start.parse().ok()?;
    Some(format!("{}-{:02}", start_year - 1, start_year % 100))
}

// ============================================================================
// Roster Aggregates
// ============================================================================

/// Why a roster player was left out of the aggregate.
///
/// Structured, not free text: consumers branch on the variant and render
/// their own copy from `Display` if they only need a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The player id had no record at the stats provider
    NotFound,
    /// Sidelined (Out / IR / Suspension); contributes zero
    Injured { status: InjuryStatus },
    /// No season with usable stats exists for this player
    NoStats,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::NotFound => write!(f, "not found"),
            ExclusionReason::Injured { .. } => write!(f, "Injured/Out"),
            ExclusionReason::NoStats => write!(f, "No stats available"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPlayer {
    pub player_id: String,
    pub name: String,
    pub reason: ExclusionReason,
}

/// One included player's season-to-date contribution to a roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerContribution {
    pub player_id: String,
    pub name: String,
    /// Season whose per-game rates were used
    pub season_used: String,
    /// Games multiplier applied to the rates (season-to-date games)
    pub games_played: u32,
    pub total_points: f64,
    pub category_points: BTreeMap<Category, f64>,
}

/// Aggregate fantasy production for one roster.
///
/// Derived data: recomputed from scratch on every ranking pass, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub roster_id: u64,
    pub total_fantasy_points: f64,
    pub category_scores: BTreeMap<Category, f64>,
    /// Sorted descending by each player's own total contribution
    pub player_breakdown: Vec<PlayerContribution>,
    pub active_player_count: usize,
    pub excluded_players: Vec<ExcludedPlayer>,
}

/// A roster's position in the league-wide power ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based dense rank; ties keep input order
    pub rank: u32,
    /// Category score as a percentage of the league max, 0..=100
    pub category_percentiles: BTreeMap<Category, f64>,
    #[serde(flatten)]
    pub stats: RosterStats,
}

// ============================================================================
// Matchups & Simulation
// ============================================================================

/// Flat matchup record as the roster provider reports it.
///
/// A bye week shows up as a missing `matchup_id` or an id no other roster
/// shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSlot {
    pub roster_id: u64,
    pub matchup_id: Option<u64>,
    #[serde(default)]
    pub points: f64,
}

/// All head-to-head pairs for one fantasy week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupWeek {
    pub week: u32,
    pub pairs: Vec<(u64, u64)>,
}

/// A proposed roster change to evaluate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub players_out: Vec<String>,
    pub players_in: Vec<String>,
}

/// Projection for one simulated future week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationWeekResult {
    pub week: u32,
    pub opponent_roster_id: u64,
    pub projected_points_without_trade: f64,
    pub projected_points_with_trade: f64,
    pub opponent_projected_points: f64,
    /// Win probability as a 0-100 percentage
    pub win_probability_without: f64,
    pub win_probability_with: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_wins_without: u32,
    pub total_wins_with: u32,
    /// `total_wins_with - total_wins_without`; negative means the trade hurts
    pub wins_improvement: i32,
    /// Bye weeks are not counted
    pub weeks_simulated: u32,
}

/// Full output of a trade simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSimulation {
    pub weeks: Vec<SimulationWeekResult>,
    pub summary: SimulationSummary,
}

// ============================================================================
// Tests
// ============================================================================
