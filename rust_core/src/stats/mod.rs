//! Season selection and category scoring.
//!
//! `season` decides which historical window represents a player's current
//! production; `categories` turns per-game rates plus league weights into
//! per-category fantasy points.

pub mod categories;
pub mod season;

pub use categories::{category_points, fantasy_points_per_game};
pub use season::{select_season, SelectedSeason};
