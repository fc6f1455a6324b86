//! Archive the month's leaderboard winner and start a fresh month.
//!
//! Run once at the start of each month.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use wxc_jobs::{open_store, reset, JobConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    wxc_obs::init("monthly-reset");

    let config = JobConfig::from_env().context("Failed to load configuration")?;
    info!("Loaded configuration: {:?}", config);

    let store = open_store(&config.store).await?;
    let label = reset::month_label(config.month_label.as_ref(), Utc::now().date_naive());

    let result = reset::run(store.as_ref(), &label).await;
    store.close().await;

    if let Err(e) = &result {
        error!("Monthly reset failed: {:#}", e);
    }
    result?;
    Ok(())
}
