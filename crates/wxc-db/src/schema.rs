//! Row types for the game schema
//!
//! These structures must match the existing database schema. The
//! observation row itself lives in `wxc-core`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wxc_core::MonthLabel;

/// Row of the precomputed `monthly_leaderboard_view`
///
/// The view may carry more columns; only these are read.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: Option<String>,
    /// Average prediction error for the month, lower is better
    pub grand_avg: Option<f64>,
}

/// Row of the append-only `monthly_winners` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyWinner {
    pub user_id: String,
    pub username: Option<String>,
    pub score: Option<f64>,
    pub month_year: MonthLabel,
}

impl MonthlyWinner {
    pub fn from_entry(entry: LeaderboardEntry, month_year: MonthLabel) -> Self {
        Self {
            user_id: entry.user_id,
            username: entry.username,
            score: entry.grand_avg,
            month_year,
        }
    }
}

/// Table names matching the game schema
pub mod tables {
    pub const ACTUAL_WEATHER: &str = "actual_weather";
    pub const PREDICTIONS: &str = "predictions";
    pub const MONTHLY_WINNERS: &str = "monthly_winners";
    pub const MONTHLY_LEADERBOARD_VIEW: &str = "monthly_leaderboard_view";
}

/// Conflict target for observation upserts
pub const OBSERVATION_CONFLICT_TARGET: &str = "station_id,date";
