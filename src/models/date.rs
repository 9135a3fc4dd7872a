//! Digest dates and the UTC merge window derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC calendar day, always rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DigestDate(NaiveDate);

impl DigestDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The calendar day before `now`, in UTC.
    pub fn previous_day(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self(today.checked_sub_days(Days::new(1)).unwrap_or(today))
    }

    /// The calendar day of `now`, in UTC.
    pub fn today(now: DateTime<Utc>) -> Self {
        Self(now.date_naive())
    }

    /// The inclusive merge window covering this day.
    pub fn window(&self) -> MergeWindow {
        MergeWindow {
            from: format!("{self}T00:00:00Z"),
            to: format!("{self}T23:59:59Z"),
        }
    }
}

impl fmt::Display for DigestDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DigestDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 10 {
            return Err(format!("invalid date '{s}': expected YYYY-MM-DD"));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| format!("invalid date '{s}': {e}"))
    }
}

impl Serialize for DigestDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DigestDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The `[from, to]` interval of one digest day, both bounds inclusive.
///
/// Bounds and compared timestamps share the fixed-width
/// `YYYY-MM-DDTHH:MM:SSZ` form, so string order is time order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWindow {
    pub from: String,
    pub to: String,
}

impl MergeWindow {
    /// Whether an upstream timestamp falls inside the window.
    ///
    /// Returns `None` when the timestamp cannot be parsed.
    pub fn contains(&self, timestamp: &str) -> Option<bool> {
        let normalized = normalize_timestamp(timestamp)?;
        Some(normalized.as_str() >= self.from.as_str() && normalized.as_str() <= self.to.as_str())
    }
}

/// Normalise an RFC 3339 timestamp to UTC `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Sub-second precision is truncated.
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim()).ok()?;
    Some(
        parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string(),
    )
}
