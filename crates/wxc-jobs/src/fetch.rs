//! Observation fetcher

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};
use wxc_core::{ObservationRow, StationId};
use wxc_db::WeatherStore;
use wxc_ingest::ObservationSource;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchSummary {
    /// Stations whose row was written, in order
    pub upserted: Vec<StationId>,
}

/// Fetch and store the latest observation of every station.
///
/// Stations are processed in order. The first failure ends the run, so
/// later stations keep whatever row they already had.
pub async fn run(
    source: &dyn ObservationSource,
    store: &dyn WeatherStore,
    stations: &[StationId],
    today: NaiveDate,
) -> Result<FetchSummary> {
    let mut upserted = Vec::with_capacity(stations.len());

    for station in stations {
        let observation = source
            .latest(station)
            .await
            .with_context(|| format!("Failed to fetch latest observation for {}", station))?;

        let row = ObservationRow::from_latest(station, today, &observation);
        debug!(
            station = %station,
            temp = ?row.temp,
            wind_speed = ?row.wind_speed,
            wind_dir = ?row.wind_dir,
            precip = row.precip,
            "Normalized observation"
        );

        store
            .upsert_observation(&row)
            .await
            .with_context(|| format!("Failed to upsert observation for {}", station))?;
        upserted.push(station.clone());
    }

    info!(
        stations = upserted.len(),
        source = source.name(),
        date = %today,
        "Observation fetch complete"
    );
    Ok(FetchSummary { upserted })
}
