//! In-process store with the same conflict semantics as the real tables

use crate::schema::{tables, LeaderboardEntry, MonthlyWinner};
use crate::{DbResult, WeatherStore};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use wxc_core::{ObservationRow, StationId};

#[derive(Default)]
struct Tables {
    actual_weather: BTreeMap<(StationId, NaiveDate), ObservationRow>,
    predictions: Vec<serde_json::Value>,
    leaderboard: Vec<LeaderboardEntry>,
    monthly_winners: Vec<MonthlyWinner>,
    upserts: Vec<StationId>,
    deletes: Vec<&'static str>,
}

/// Store kept entirely in memory
///
/// Records every upsert and delete so callers can check what a job did.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of the leaderboard view
    pub async fn set_leaderboard(&self, entries: Vec<LeaderboardEntry>) {
        self.tables.lock().await.leaderboard = entries;
    }

    pub async fn add_prediction(&self, prediction: serde_json::Value) {
        self.tables.lock().await.predictions.push(prediction);
    }

    pub async fn observations(&self) -> Vec<ObservationRow> {
        self.tables
            .lock()
            .await
            .actual_weather
            .values()
            .cloned()
            .collect()
    }

    pub async fn prediction_count(&self) -> usize {
        self.tables.lock().await.predictions.len()
    }

    pub async fn winners(&self) -> Vec<MonthlyWinner> {
        self.tables.lock().await.monthly_winners.clone()
    }

    /// Stations passed to `upsert_observation`, in call order
    pub async fn upsert_calls(&self) -> Vec<StationId> {
        self.tables.lock().await.upserts.clone()
    }

    /// Tables passed to a delete-all, in call order
    pub async fn delete_calls(&self) -> Vec<&'static str> {
        self.tables.lock().await.deletes.clone()
    }
}

/// Ascending order with missing averages after every present one
fn nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl WeatherStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn upsert_observation(&self, row: &ObservationRow) -> DbResult<()> {
        let mut state = self.tables.lock().await;
        state.upserts.push(row.station_id.clone());
        state.actual_weather.insert(row.key(), row.clone());
        Ok(())
    }

    async fn top_leaderboard_entry(&self) -> DbResult<Option<LeaderboardEntry>> {
        let state = self.tables.lock().await;
        Ok(state
            .leaderboard
            .iter()
            .min_by(|a, b| nulls_last(a.grand_avg, b.grand_avg))
            .cloned())
    }

    async fn insert_monthly_winner(&self, winner: &MonthlyWinner) -> DbResult<()> {
        self.tables
            .lock()
            .await
            .monthly_winners
            .push(winner.clone());
        Ok(())
    }

    async fn delete_all_predictions(&self) -> DbResult<u64> {
        let mut state = self.tables.lock().await;
        state.deletes.push(tables::PREDICTIONS);
        let deleted = state.predictions.len() as u64;
        state.predictions.clear();
        Ok(deleted)
    }

    async fn delete_all_observations(&self) -> DbResult<u64> {
        let mut state = self.tables.lock().await;
        state.deletes.push(tables::ACTUAL_WEATHER);
        let deleted = state.actual_weather.len() as u64;
        state.actual_weather.clear();
        Ok(deleted)
    }
}
