//! Job configuration from environment variables

use std::fmt;
use url::Url;
use wxc_core::{MonthLabel, StationId};
use wxc_ingest::{DEFAULT_NWS_BASE_URL, DEFAULT_USER_AGENT};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the jobs read and write game data
#[derive(Clone)]
pub enum StoreConfig {
    /// Managed backend REST endpoint plus access key
    Rest { url: Url, key: String },
    /// Direct Postgres connection
    Postgres { database_url: String },
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Credentials stay out of the logs.
        match self {
            StoreConfig::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", &url.as_str())
                .field("key", &"<redacted>")
                .finish(),
            StoreConfig::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobConfig {
    pub store: StoreConfig,

    /// Weather provider base URL (default: https://api.weather.gov)
    pub nws_base_url: String,

    /// User-Agent sent to the provider
    pub user_agent: String,

    /// Stations to poll, in order
    pub stations: Vec<StationId>,

    /// Explicit hall-of-fame label; derived from the run date when unset
    pub month_label: Option<MonthLabel>,
}

impl JobConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store = match get("DATABASE_URL") {
            Some(database_url) => {
                let parsed = Url::parse(&database_url).map_err(|e| ConfigError::Invalid {
                    name: "DATABASE_URL",
                    reason: e.to_string(),
                })?;
                if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                    return Err(ConfigError::Invalid {
                        name: "DATABASE_URL",
                        reason: format!("unsupported scheme {}", parsed.scheme()),
                    });
                }
                StoreConfig::Postgres { database_url }
            }
            None => {
                let url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                let url = Url::parse(&url).map_err(|e| ConfigError::Invalid {
                    name: "SUPABASE_URL",
                    reason: e.to_string(),
                })?;
                let key = get("SUPABASE_KEY")
                    .or_else(|| get("SUPABASE_SERVICE_KEY"))
                    .ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
                StoreConfig::Rest { url, key }
            }
        };

        let nws_base_url = get("NWS_API_BASE").unwrap_or_else(|| DEFAULT_NWS_BASE_URL.to_string());
        Url::parse(&nws_base_url).map_err(|e| ConfigError::Invalid {
            name: "NWS_API_BASE",
            reason: e.to_string(),
        })?;

        let user_agent = get("NWS_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let stations = match get("WXC_STATIONS") {
            Some(list) => StationId::parse_list(&list).map_err(|e| ConfigError::Invalid {
                name: "WXC_STATIONS",
                reason: e.to_string(),
            })?,
            None => StationId::defaults(),
        };

        let month_label = get("RESET_MONTH_LABEL").map(|label| MonthLabel::custom(label.trim()));

        Ok(Self {
            store,
            nws_base_url,
            user_agent,
            stations,
            month_label,
        })
    }
}
