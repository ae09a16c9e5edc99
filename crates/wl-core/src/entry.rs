//! The work entry value type.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used for entries whose block never named a location.
pub const UNKNOWN_LOCATION_LABEL: &str = "Unknown";

/// A `TimeEntry` could not be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry on {date} ends at {end} which is not after its start {start}")]
    NonPositiveDuration {
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// One unit of logged work.
///
/// Entries are immutable once built. `end` is always strictly after `start`,
/// and may fall on the day after `date` for overnight work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeEntry")]
pub struct TimeEntry {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
    location_code: String,
    location_label: String,
    description: String,
}

/// Unvalidated wire shape of [`TimeEntry`].
#[derive(Deserialize)]
struct RawTimeEntry {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(default)]
    location_code: String,
    #[serde(default)]
    location_label: String,
    #[serde(default)]
    description: String,
}

impl TryFrom<RawTimeEntry> for TimeEntry {
    type Error = EntryError;

    fn try_from(raw: RawTimeEntry) -> Result<Self, Self::Error> {
        let label = if raw.location_label.is_empty() {
            UNKNOWN_LOCATION_LABEL.to_string()
        } else {
            raw.location_label
        };
        Self::new(
            raw.date,
            raw.start,
            raw.end,
            raw.location_code,
            label,
            raw.description,
        )
    }
}

impl TimeEntry {
    /// Creates an entry after checking that it has a positive duration.
    pub fn new(
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
        location_code: impl Into<String>,
        location_label: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, EntryError> {
        if end <= start {
            return Err(EntryError::NonPositiveDuration { date, start, end });
        }
        Ok(Self {
            date,
            start,
            end,
            location_code: location_code.into(),
            location_label: location_label.into(),
            description: description.into(),
        })
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn location_code(&self) -> &str {
        &self.location_code
    }

    pub fn location_label(&self) -> &str {
        &self.location_label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Time between start and end. Always positive.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Sets the location while the entry is still being assembled.
    pub(crate) fn attach_location(&mut self, code: &str, label: &str) {
        code.clone_into(&mut self.location_code);
        label.clone_into(&mut self.location_label);
    }

    /// Sets the description while the entry is still being assembled.
    pub(crate) fn set_description(&mut self, description: String) {
        self.description = description;
    }

    /// Whether the two entries share part of the same day's time.
    ///
    /// Touching ranges (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            self.date.format("%Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.location_label
        )
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime};

    use super::TimeEntry;

    /// Builds a same-day entry from `(y, m, d)` and `HH:MM` strings.
    pub fn entry(ymd: (i32, u32, u32), start: &str, end: &str, code: &str) -> TimeEntry {
        let date = NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap();
        let start = date.and_time(NaiveTime::parse_from_str(start, "%H:%M").unwrap());
        let mut end = date.and_time(NaiveTime::parse_from_str(end, "%H:%M").unwrap());
        if end <= start {
            end += chrono::Duration::days(1);
        }
        let label = match code {
            "C" => "Company",
            "H" => "Homeoffice",
            _ => "Unknown",
        };
        TimeEntry::new(date, start, end, code, label, "").unwrap()
    }

    pub fn with_description(entry: &TimeEntry, description: &str) -> TimeEntry {
        TimeEntry::new(
            entry.date(),
            entry.start(),
            entry.end(),
            entry.location_code(),
            entry.location_label(),
            description,
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::entry;
    use super::*;

    #[test]
    fn new_rejects_non_positive_duration() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let at = date.and_hms_opt(9, 0, 0).unwrap();
        assert!(TimeEntry::new(date, at, at, "C", "Company", "").is_err());
        assert!(TimeEntry::new(date, at, at - Duration::hours(1), "C", "Company", "").is_err());
    }

    #[test]
    fn duration_spans_midnight() {
        let e = entry((2025, 6, 30), "22:00", "01:00", "H");
        assert_eq!(e.duration(), Duration::hours(3));
        assert_eq!(e.end().date(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
    }

    #[test]
    fn overlaps_excludes_touching_ranges() {
        let a = entry((2025, 6, 30), "09:00", "12:00", "C");
        let b = entry((2025, 6, 30), "12:00", "13:00", "C");
        let c = entry((2025, 6, 30), "11:00", "13:00", "C");
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn serde_roundtrip_preserves_fields() {
        let e = entry((2025, 6, 30), "09:00", "12:00", "C");
        let json = serde_json::to_string(&e).unwrap();
        let parsed: TimeEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, e);
    }

    #[test]
    fn serde_rejects_inverted_range() {
        let json = r#"{
            "date": "2025-06-30",
            "start": "2025-06-30T12:00:00",
            "end": "2025-06-30T09:00:00",
            "location_code": "C",
            "location_label": "Company",
            "description": ""
        }"#;
        let result: Result<TimeEntry, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn serde_fills_missing_label() {
        let json = r#"{
            "date": "2025-06-30",
            "start": "2025-06-30T09:00:00",
            "end": "2025-06-30T10:00:00"
        }"#;
        let parsed: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.location_label(), UNKNOWN_LOCATION_LABEL);
        assert_eq!(parsed.location_code(), "");
    }

    #[test]
    fn display_is_compact() {
        let e = entry((2025, 6, 30), "09:00", "12:00", "C");
        assert_eq!(e.to_string(), "2025-06-30 09:00-12:00 Company");
    }
}
