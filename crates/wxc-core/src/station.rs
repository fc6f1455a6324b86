//! Weather station identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stations tracked by the game
pub const DEFAULT_STATIONS: [&str; 3] = ["KATL", "KORD", "KDFW"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StationError {
    #[error("Empty station identifier")]
    Empty,

    #[error("Invalid station identifier: {0}")]
    Invalid(String),
}

/// Short code naming a physical observation station (e.g. `KATL`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    pub fn new(code: &str) -> Result<Self, StationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(StationError::Empty);
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StationError::Invalid(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fixed station list
    pub fn defaults() -> Vec<StationId> {
        DEFAULT_STATIONS
            .iter()
            .map(|code| StationId(code.to_string()))
            .collect()
    }

    /// Parse a comma-separated list such as `KATL,KORD`
    pub fn parse_list(list: &str) -> Result<Vec<StationId>, StationError> {
        let stations = list
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(StationId::new)
            .collect::<Result<Vec<_>, _>>()?;

        if stations.is_empty() {
            return Err(StationError::Empty);
        }
        Ok(stations)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StationId {
    type Err = StationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StationId::new(s)
    }
}

impl TryFrom<String> for StationId {
    type Error = StationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StationId::new(&value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
