//! Persistence for observations, predictions and the hall of fame
//!
//! Uses the existing game schema - NO migrations. Tables touched:
//! `actual_weather`, `predictions`, `monthly_winners` and the read-only
//! `monthly_leaderboard_view`.

pub mod memory;
pub mod postgres;
pub mod rest;
pub mod schema;

pub use memory::*;
pub use postgres::*;
pub use rest::*;
pub use schema::*;

use thiserror::Error;
use tracing::info;
use wxc_core::{MonthLabel, ObservationRow};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend returned {status} for {table}: {body}")]
    Backend {
        table: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Outcome of a monthly reset
#[derive(Debug, Clone, PartialEq)]
pub struct MonthClose {
    /// Archived winner, if the leaderboard had any entry
    pub winner: Option<MonthlyWinner>,
    pub predictions_deleted: u64,
    pub observations_deleted: u64,
}

/// Storage operations the jobs need
#[async_trait::async_trait]
pub trait WeatherStore: Send + Sync {
    /// Backend name/identifier
    fn name(&self) -> &str;

    /// Insert or update the `actual_weather` row keyed on `(station_id, date)`
    async fn upsert_observation(&self, row: &ObservationRow) -> DbResult<()>;

    /// Best entry of `monthly_leaderboard_view` (lowest `grand_avg`)
    async fn top_leaderboard_entry(&self) -> DbResult<Option<LeaderboardEntry>>;

    async fn insert_monthly_winner(&self, winner: &MonthlyWinner) -> DbResult<()>;

    async fn delete_all_predictions(&self) -> DbResult<u64>;

    async fn delete_all_observations(&self) -> DbResult<u64>;

    /// Archive the month's winner and wipe the working tables.
    ///
    /// This default runs each step on its own; a failure part way leaves
    /// the earlier steps applied. Backends with transactions override it.
    async fn reset_month(&self, label: &MonthLabel) -> DbResult<MonthClose> {
        let winner = self
            .top_leaderboard_entry()
            .await?
            .map(|entry| MonthlyWinner::from_entry(entry, label.clone()));

        match &winner {
            Some(w) => {
                self.insert_monthly_winner(w).await?;
                info!(user_id = %w.user_id, username = ?w.username, score = ?w.score, "Archived monthly winner");
            }
            None => info!("Leaderboard is empty, no winner archived"),
        }

        let predictions_deleted = self.delete_all_predictions().await?;
        let observations_deleted = self.delete_all_observations().await?;

        Ok(MonthClose {
            winner,
            predictions_deleted,
            observations_deleted,
        })
    }

    /// Release backend resources at the end of an invocation
    async fn close(&self) {}
}
