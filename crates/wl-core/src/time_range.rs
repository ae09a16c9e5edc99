//! `HH:MM - HH:MM` range resolution with overnight rollover.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::config::ParserConfig;
use crate::error::{ConfigError, ResolveError};

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("clock time pattern is a valid regex"));

/// Resolves time range tokens against an anchor date.
#[derive(Debug, Clone)]
pub struct TimeRangeResolver {
    separators: Vec<char>,
    /// Loose shape used for classification: two times around a separator,
    /// anywhere in the line.
    shape: Regex,
}

impl TimeRangeResolver {
    /// Builds a resolver accepting any of `separators` between the two times.
    pub fn new(separators: &[char]) -> Result<Self, ConfigError> {
        if separators.is_empty() {
            return Err(ConfigError::NoSeparators);
        }
        let class: String = separators
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let shape = Regex::new(&format!(r"\d{{1,2}}:\d{{2}}\s*[{class}]\s*\d{{1,2}}:\d{{2}}"))?;
        Ok(Self {
            separators: separators.to_vec(),
            shape,
        })
    }

    pub fn from_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        Self::new(&config.time_separators)
    }

    /// Whether the line looks like a time range.
    ///
    /// Lines with this shape are classified as ranges even if
    /// [`TimeRangeResolver::resolve`] later rejects them.
    pub fn matches(&self, token: &str) -> bool {
        self.shape.is_match(token)
    }

    /// Resolves the token to `(start, end)` on `date`.
    ///
    /// When the end time is not after the start time the range is taken to
    /// run past midnight and the end moves to the next day, so the returned
    /// duration is always positive.
    pub fn resolve(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<(NaiveDateTime, NaiveDateTime), ResolveError> {
        let invalid = |reason: String| ResolveError::InvalidTimeRange {
            token: token.to_string(),
            reason,
        };

        let parts: Vec<&str> = token
            .split(|c| self.separators.contains(&c))
            .map(str::trim)
            .collect();
        let [start, end] = parts.as_slice() else {
            return Err(invalid(format!(
                "expected two times around one separator, found {} parts",
                parts.len()
            )));
        };

        let start = date.and_time(parse_clock_time(start).map_err(invalid)?);
        let mut end = date.and_time(parse_clock_time(end).map_err(invalid)?);
        if end <= start {
            end += Duration::days(1);
            tracing::trace!(token, "range rolls over midnight");
        }
        Ok((start, end))
    }
}

fn parse_clock_time(part: &str) -> Result<NaiveTime, String> {
    let caps = CLOCK_TIME
        .captures(part)
        .ok_or_else(|| format!("'{part}' is not HH:MM"))?;
    let hour: u32 = caps[1].parse().map_err(|_| format!("'{part}' is not HH:MM"))?;
    let minute: u32 = caps[2].parse().map_err(|_| format!("'{part}' is not HH:MM"))?;
    if hour > 23 {
        return Err(format!("hour {hour} out of range"));
    }
    if minute > 59 {
        return Err(format!("minute {minute} out of range"));
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| format!("'{part}' is not a valid time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    fn resolver() -> TimeRangeResolver {
        TimeRangeResolver::from_config(&ParserConfig::default()).unwrap()
    }

    #[test]
    fn same_day_range() {
        let (start, end) = resolver().resolve("21:30-22:30", day()).unwrap();
        assert_eq!(start, day().and_hms_opt(21, 30, 0).unwrap());
        assert_eq!(end, day().and_hms_opt(22, 30, 0).unwrap());
        assert_eq!(end - start, Duration::hours(1));
    }

    #[test]
    fn overnight_range_rolls_to_next_day() {
        let (start, end) = resolver().resolve("22:00-01:00", day()).unwrap();
        assert_eq!(end.date(), day().succ_opt().unwrap());
        assert_eq!(end - start, Duration::hours(3));
    }

    #[test]
    fn equal_times_roll_to_a_full_day() {
        let (start, end) = resolver().resolve("9:00-9:00", day()).unwrap();
        assert_eq!(end - start, Duration::hours(24));
    }

    #[test]
    fn accepts_whitespace_and_dash_variants() {
        for token in ["9:00 - 12:00", "9:00–12:00", "09:00 — 12:00", "  9:00-12:00  "] {
            let (start, end) = resolver()
                .resolve(token, day())
                .unwrap_or_else(|e| panic!("{token:?}: {e}"));
            assert_eq!(end - start, Duration::hours(3), "{token:?}");
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let err = resolver().resolve("25:00-26:00", day()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidTimeRange {
                token: "25:00-26:00".into(),
                reason: "hour 25 out of range".into()
            }
        );
        assert!(resolver().resolve("9:60-10:00", day()).is_err());
    }

    #[test]
    fn rejects_wrong_part_count_and_trailing_text() {
        assert!(resolver().resolve("9:00-12:00-13:00", day()).is_err());
        assert!(resolver().resolve("9:00-12:00 Uhr", day()).is_err());
        assert!(resolver().resolve("9:00", day()).is_err());
    }

    #[test]
    fn matches_checks_shape_only() {
        let r = resolver();
        assert!(r.matches("9:00 - 12:00"));
        assert!(r.matches("13:00-17:00"));
        assert!(r.matches("25:00-26:00"));
        assert!(!r.matches("30.6.25"));
        assert!(!r.matches("C"));
        assert!(!r.matches("Besprechung"));
    }

    #[test]
    fn custom_separators() {
        let r = TimeRangeResolver::new(&['/']).unwrap();
        assert!(r.matches("9:00/10:00"));
        assert!(!r.matches("9:00-10:00"));
        assert!(r.resolve("9:00/10:00", day()).is_ok());
    }

    #[test]
    fn empty_separator_set_is_rejected() {
        assert!(matches!(
            TimeRangeResolver::new(&[]),
            Err(ConfigError::NoSeparators)
        ));
    }
}
