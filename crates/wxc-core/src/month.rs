//! Hall-of-fame month labels

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label stored in `monthly_winners.month_year`, e.g. `Dec-2025`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthLabel(String);

impl MonthLabel {
    /// Label for the month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self(date.format("%b-%Y").to_string())
    }

    /// Label for the month that ended before `today`.
    ///
    /// The reset runs at the start of a month and archives the previous one.
    pub fn closing(today: NaiveDate) -> Self {
        let last_of_previous = today - Duration::days(i64::from(today.day()));
        Self::of(last_of_previous)
    }

    /// Use an operator-supplied label verbatim
    pub fn custom(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
