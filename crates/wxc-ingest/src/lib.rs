//! Weather provider adapters
//!
//! Fetches the latest observation for a station. The only provider wired
//! up today is the National Weather Service API (`api.weather.gov`).

pub mod nws;

pub use nws::*;

use thiserror::Error;
use wxc_core::{LatestObservation, StationId};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status} for station {station}: {body}")]
    Status {
        station: StationId,
        status: u16,
        body: String,
    },

    #[error("Malformed observation for station {station}: {source}")]
    Decode {
        station: StationId,
        #[source]
        source: serde_json::Error,
    },
}

pub type IngestResult<T> = Result<T, IngestError>;

/// Anything that can report a station's most recent observation
#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Fetch the latest observation for one station
    async fn latest(&self, station: &StationId) -> IngestResult<LatestObservation>;
}
