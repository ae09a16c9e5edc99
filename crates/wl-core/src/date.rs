//! Day-first date token resolution.
//!
//! Tokens are tried against a fixed, ordered list of patterns and the first
//! pattern that recognizes the token decides how it is read:
//!
//! 1. `DD.MM.YYYY`
//! 2. `DD.MM.YY` (read as `20YY`)
//! 3. `DD. <Month>` (current year)
//! 4. `DD.MM` (current year)
//!
//! Month-first readings are never attempted.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::clock::Clock;
use crate::config::ParserConfig;
use crate::error::ResolveError;

/// Numbers pulled out of a token before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    day: u32,
    month: u32,
    /// `None` means "use the current year".
    year: Option<i32>,
}

type Extract = fn(&Captures<'_>, &ParserConfig) -> Option<DateParts>;

/// One recognized date shape.
struct DatePattern {
    name: &'static str,
    regex: Regex,
    extract: Extract,
}

impl DatePattern {
    fn new(name: &'static str, pattern: &str, extract: Extract) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("date pattern is a valid regex"),
            extract,
        }
    }

    fn parts(&self, token: &str, config: &ParserConfig) -> Option<DateParts> {
        let caps = self.regex.captures(token)?;
        (self.extract)(&caps, config)
    }
}

/// Patterns in priority order.
static DATE_PATTERNS: LazyLock<[DatePattern; 4]> = LazyLock::new(|| {
    [
        DatePattern::new("DD.MM.YYYY", r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$", full_year),
        DatePattern::new("DD.MM.YY", r"^(\d{1,2})\.(\d{1,2})\.(\d{2})$", short_year),
        DatePattern::new("DD. Month", r"^(\d{1,2})\.\s*(\p{L}+)\.?$", month_name),
        DatePattern::new("DD.MM", r"^(\d{1,2})\.(\d{1,2})\.?$", day_month),
    ]
});

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group)?.as_str().parse().ok()
}

fn full_year(caps: &Captures<'_>, _: &ParserConfig) -> Option<DateParts> {
    Some(DateParts {
        day: number(caps, 1)?,
        month: number(caps, 2)?,
        year: Some(number(caps, 3)?),
    })
}

fn short_year(caps: &Captures<'_>, _: &ParserConfig) -> Option<DateParts> {
    let yy: i32 = number(caps, 3)?;
    Some(DateParts {
        day: number(caps, 1)?,
        month: number(caps, 2)?,
        year: Some(2000 + yy),
    })
}

fn month_name(caps: &Captures<'_>, config: &ParserConfig) -> Option<DateParts> {
    Some(DateParts {
        day: number(caps, 1)?,
        month: config.month(caps.get(2)?.as_str())?,
        year: None,
    })
}

fn day_month(caps: &Captures<'_>, _: &ParserConfig) -> Option<DateParts> {
    Some(DateParts {
        day: number(caps, 1)?,
        month: number(caps, 2)?,
        year: None,
    })
}

/// Resolves date tokens against a fixed current year.
#[derive(Debug, Clone)]
pub struct DateResolver<'a> {
    config: &'a ParserConfig,
    current_year: i32,
}

impl<'a> DateResolver<'a> {
    /// Creates a resolver, reading the current year from `clock` once.
    pub fn new(config: &'a ParserConfig, clock: &impl Clock) -> Self {
        Self {
            config,
            current_year: clock.current_year(),
        }
    }

    /// The year assumed for tokens that omit it.
    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Whether any pattern recognizes the token's shape.
    ///
    /// A recognized token can still fail calendar validation in
    /// [`DateResolver::resolve`] (for example `30.2.25`).
    pub fn matches(&self, token: &str) -> bool {
        self.recognize(token.trim()).is_some()
    }

    /// Resolves the token to a calendar date.
    pub fn resolve(&self, token: &str) -> Result<NaiveDate, ResolveError> {
        let trimmed = token.trim();
        let invalid = || ResolveError::InvalidDate {
            token: token.to_string(),
        };

        let (pattern, parts) = self.recognize(trimmed).ok_or_else(invalid)?;
        let year = parts.year.unwrap_or(self.current_year);
        let date = NaiveDate::from_ymd_opt(year, parts.month, parts.day).ok_or_else(invalid)?;
        tracing::trace!(token = trimmed, pattern, %date, "resolved date");
        Ok(date)
    }

    fn recognize(&self, token: &str) -> Option<(&'static str, DateParts)> {
        DATE_PATTERNS
            .iter()
            .find_map(|p| p.parts(token, self.config).map(|parts| (p.name, parts)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(token: &str) -> Result<NaiveDate, ResolveError> {
        let config = ParserConfig::default();
        let clock = FixedClock::year(2025).unwrap();
        DateResolver::new(&config, &clock).resolve(token)
    }

    #[test]
    fn two_digit_year_is_2000_based() {
        assert_eq!(resolve("30.6.25"), Ok(ymd(2025, 6, 30)));
        assert_eq!(resolve("01.01.99"), Ok(ymd(2099, 1, 1)));
    }

    #[test]
    fn four_digit_year() {
        assert_eq!(resolve("01.07.2025"), Ok(ymd(2025, 7, 1)));
        assert_eq!(resolve("1.7.2024"), Ok(ymd(2024, 7, 1)));
    }

    #[test]
    fn day_month_uses_injected_year() {
        assert_eq!(resolve("13.9"), Ok(ymd(2025, 9, 13)));
        assert_eq!(resolve("13.9."), Ok(ymd(2025, 9, 13)));

        let config = ParserConfig::default();
        let clock = FixedClock::year(2031).unwrap();
        let resolver = DateResolver::new(&config, &clock);
        assert_eq!(resolver.current_year(), 2031);
        assert_eq!(resolver.resolve("13.9"), Ok(ymd(2031, 9, 13)));
    }

    #[test]
    fn day_with_month_name() {
        assert_eq!(resolve("13. Sept"), Ok(ymd(2025, 9, 13)));
        assert_eq!(resolve("5. März"), Ok(ymd(2025, 3, 5)));
        assert_eq!(resolve("1.july"), Ok(ymd(2025, 7, 1)));
        assert_eq!(resolve("24. Dez."), Ok(ymd(2025, 12, 24)));
    }

    #[test]
    fn day_first_is_fixed() {
        // 12.03 is March 12th, never December 3rd.
        assert_eq!(resolve("12.03.2025"), Ok(ymd(2025, 3, 12)));
        // Month 13 is rejected rather than swapped.
        assert!(resolve("5.13.2025").is_err());
    }

    #[test]
    fn calendar_validation_rejects_impossible_days() {
        let err = resolve("30.2.25").unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidDate {
                token: "30.2.25".into()
            }
        );
        assert!(resolve("29.2.25").is_err());
        assert_eq!(resolve("29.2.24"), Ok(ymd(2024, 2, 29)));
    }

    #[test]
    fn unrecognized_tokens_are_rejected() {
        for token in ["July", "9:00 - 12:00", "C", "12.03.202", "13. Meeting", ""] {
            assert!(resolve(token).is_err(), "{token:?} should not resolve");
        }
    }

    #[test]
    fn matches_is_syntactic() {
        let config = ParserConfig::default();
        let clock = FixedClock::year(2025).unwrap();
        let resolver = DateResolver::new(&config, &clock);

        assert!(resolver.matches("30.6.25"));
        assert!(resolver.matches("13.9"));
        assert!(resolver.matches("30.2.25"), "shape matches even if the day is invalid");
        assert!(!resolver.matches("July"));
        assert!(!resolver.matches("13. Meeting"));
        assert!(!resolver.matches("9:00-12:00"));
    }

    #[test]
    fn error_carries_original_token() {
        let err = resolve(" 31.4.25 ").unwrap_err();
        assert_eq!(err.to_string(), "invalid date ' 31.4.25 '");
    }
}
