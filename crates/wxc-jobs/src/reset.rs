//! Monthly reset

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;
use wxc_core::MonthLabel;
use wxc_db::{MonthClose, WeatherStore};

/// Label to archive under: the configured one, else the month before `today`
pub fn month_label(configured: Option<&MonthLabel>, today: NaiveDate) -> MonthLabel {
    configured
        .cloned()
        .unwrap_or_else(|| MonthLabel::closing(today))
}

/// Archive the leaderboard winner and clear predictions and observations.
///
/// Running it again after a reset finds an empty leaderboard and deletes
/// nothing.
pub async fn run(store: &dyn WeatherStore, label: &MonthLabel) -> Result<MonthClose> {
    info!(month = %label, backend = store.name(), "Starting monthly reset");

    let close = store
        .reset_month(label)
        .await
        .with_context(|| format!("Monthly reset for {} failed", label))?;

    info!(
        predictions_deleted = close.predictions_deleted,
        observations_deleted = close.observations_deleted,
        "Cleared working tables"
    );
    info!("Monthly reset complete. New month started.");
    Ok(close)
}
