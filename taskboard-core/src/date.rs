//! Calendar-date handling for due dates.
//!
//! Due dates travel as ISO `YYYY-MM-DD`, sometimes with a `T...` time tail
//! appended by the backend. They are decomposed numerically instead of being
//! handed to a timezone-aware parser: a bare date parsed as UTC midnight
//! renders as the previous day in any negative-offset locale.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid calendar date: {0:?}")]
pub struct DateError(pub String);

/// A plain calendar date with no time-of-day or offset attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Parse `YYYY-MM-DD` (or `YYYY-MM-DDT...`) by explicit component split.
    pub fn parse_iso(input: &str) -> Result<Self, DateError> {
        let date_part = input.split('T').next().unwrap_or(input).trim();
        let parts: Vec<&str> = date_part.split('-').collect();
        if parts.len() != 3 {
            return Err(DateError(input.to_string()));
        }

        let year: i32 = parts[0].parse().map_err(|_| DateError(input.to_string()))?;
        let month: u32 = parts[1].parse().map_err(|_| DateError(input.to_string()))?;
        let day: u32 = parts[2].parse().map_err(|_| DateError(input.to_string()))?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError(input.to_string()))
    }

    /// The wire form, `YYYY-MM-DD`.
    pub fn to_wire(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

/// Cards show dates as `DD/MM/YYYY`.
impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DueDate::parse_iso(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_iso_date() {
        let d = DueDate::parse_iso("2025-01-01").unwrap();
        assert_eq!(d.to_wire(), "2025-01-01");
    }

    #[test]
    fn utc_midnight_tail_does_not_shift_the_day() {
        // The whole point: never interpret this as an instant.
        let d = DueDate::parse_iso("2025-03-05T00:00:00Z").unwrap();
        assert_eq!(d.to_string(), "05/03/2025");
        assert_eq!(d.to_wire(), "2025-03-05");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(DueDate::parse_iso("").is_err());
        assert!(DueDate::parse_iso("05/03/2025").is_err());
        assert!(DueDate::parse_iso("2025-03").is_err());
        assert!(DueDate::parse_iso("2025-13-01").is_err());
        assert!(DueDate::parse_iso("2025-02-30").is_err());
        assert!(DueDate::parse_iso("tomorrow").is_err());
    }

    #[test]
    fn serde_round_trips_through_the_wire_form() {
        let d = DueDate::parse_iso("2024-12-31").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2024-12-31\"");
        let back: DueDate = serde_json::from_str("\"2024-12-31T00:00:00Z\"").unwrap();
        assert_eq!(back, d);
    }
}
