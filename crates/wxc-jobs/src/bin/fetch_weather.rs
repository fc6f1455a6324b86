//! Poll the weather provider and upsert today's observation per station.
//!
//! Meant to run every few minutes from cron or a similar scheduler; a
//! failed run exits non-zero and the next tick simply tries again.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use wxc_ingest::NwsClient;
use wxc_jobs::{fetch, open_store, JobConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    wxc_obs::init("fetch-weather");

    let config = JobConfig::from_env().context("Failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    let store = open_store(&config.store).await?;
    let source = NwsClient::new(&config.nws_base_url, &config.user_agent)
        .context("Failed to build weather provider client")?;

    let today = Utc::now().date_naive();
    let result = fetch::run(&source, store.as_ref(), &config.stations, today).await;
    store.close().await;

    if let Err(e) = &result {
        error!("Observation fetch failed: {:#}", e);
    }
    result?;
    Ok(())
}
