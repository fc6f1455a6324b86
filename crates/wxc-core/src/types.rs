//! Provider payloads and the normalized observation row

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::StationId;

/// A single sensor reading as reported by the provider
///
/// The provider reports unknown readings either by omitting the object or
/// by sending `"value": null`; both end up as `value == None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub value: Option<f64>,

    #[serde(default, rename = "unitCode")]
    pub unit_code: Option<String>,
}

/// The `properties` object of a latest-observation response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationProperties {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub temperature: Option<Measurement>,

    #[serde(default)]
    pub wind_speed: Option<Measurement>,

    #[serde(default)]
    pub wind_direction: Option<Measurement>,

    #[serde(default)]
    pub precipitation_last_hour: Option<Measurement>,
}

/// Response body of `GET /stations/{id}/observations/latest`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LatestObservation {
    pub properties: ObservationProperties,
}

fn reading(measurement: &Option<Measurement>) -> Option<f64> {
    measurement.as_ref().and_then(|m| m.value)
}

impl LatestObservation {
    pub fn temperature(&self) -> Option<f64> {
        reading(&self.properties.temperature)
    }

    pub fn wind_speed(&self) -> Option<f64> {
        reading(&self.properties.wind_speed)
    }

    pub fn wind_direction(&self) -> Option<f64> {
        reading(&self.properties.wind_direction)
    }

    pub fn precipitation_last_hour(&self) -> Option<f64> {
        reading(&self.properties.precipitation_last_hour)
    }
}

/// Row of the `actual_weather` table
///
/// `(station_id, date)` is the natural key; writers upsert on it so a
/// station has at most one row per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub station_id: StationId,
    pub date: NaiveDate,
    pub temp: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_dir: Option<f64>,
    pub precip: f64,
}

impl ObservationRow {
    /// Normalize a provider observation into a table row.
    ///
    /// Missing temperature and wind readings stay empty; missing
    /// precipitation counts as no precipitation.
    pub fn from_latest(station: &StationId, date: NaiveDate, obs: &LatestObservation) -> Self {
        Self {
            station_id: station.clone(),
            date,
            temp: obs.temperature(),
            wind_speed: obs.wind_speed(),
            wind_dir: obs.wind_direction(),
            precip: obs.precipitation_last_hour().unwrap_or(0.0),
        }
    }

    /// Upsert key
    pub fn key(&self) -> (StationId, NaiveDate) {
        (self.station_id.clone(), self.date)
    }
}
