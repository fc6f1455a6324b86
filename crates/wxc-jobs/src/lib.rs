//! Scheduled jobs for the weather challenge
//!
//! - `fetch`: poll the provider for each station and upsert today's row
//! - `reset`: archive the month's winner and wipe the working tables
//!
//! Each job is a single pass run to completion by an external scheduler.
//! Both binaries build their store from `JobConfig` at start and close it
//! before exiting.

pub mod config;
pub mod fetch;
pub mod reset;

pub use config::*;

use anyhow::{Context, Result};
use tracing::info;
use wxc_db::{PgStore, RestStore, WeatherStore};

/// Open the backend described by `config`
pub async fn open_store(config: &StoreConfig) -> Result<Box<dyn WeatherStore>> {
    let store: Box<dyn WeatherStore> = match config {
        StoreConfig::Rest { url, key } => Box::new(
            RestStore::new(url.as_str(), key.as_str()).context("Failed to build REST client")?,
        ),
        StoreConfig::Postgres { database_url } => {
            let store = PgStore::connect(database_url)
                .await
                .context("Failed to connect to database")?;
            store.ping().await.context("Database ping failed")?;
            Box::new(store)
        }
    };

    info!(backend = store.name(), "Store ready");
    Ok(store)
}
