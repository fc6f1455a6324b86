//! Core data types for the weather challenge jobs
//!
//! This crate holds the station identifiers, the provider payload for a
//! station's latest observation, the normalized row written to
//! `actual_weather`, and the month labels used by the hall of fame.

pub mod month;
pub mod station;
pub mod types;

pub use month::*;
pub use station::*;
pub use types::*;
