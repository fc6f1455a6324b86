//! National Weather Service client

use crate::{IngestError, IngestResult, ObservationSource};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use tracing::{debug, instrument};
use wxc_core::{LatestObservation, StationId};

pub const DEFAULT_NWS_BASE_URL: &str = "https://api.weather.gov";

/// The NWS API rejects requests without an identifying User-Agent
pub const DEFAULT_USER_AGENT: &str = "(WeatherChallengeBot, your@email.com)";

pub struct NwsClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> IngestResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn latest_url(&self, station: &StationId) -> String {
        format!(
            "{}/stations/{}/observations/latest",
            self.base_url, station
        )
    }
}

#[async_trait::async_trait]
impl ObservationSource for NwsClient {
    fn name(&self) -> &str {
        "nws"
    }

    #[instrument(skip(self), fields(station = %station))]
    async fn latest(&self, station: &StationId) -> IngestResult<LatestObservation> {
        let resp = self
            .client
            .get(self.latest_url(station))
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/geo+json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(IngestError::Status {
                station: station.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let observation =
            serde_json::from_str(&body).map_err(|source| IngestError::Decode {
                station: station.clone(),
                source,
            })?;

        debug!("Fetched latest observation ({} bytes)", body.len());
        Ok(observation)
    }
}
