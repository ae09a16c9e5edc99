//! Source of "today" for tokens that omit the year.

use chrono::{Datelike, Local, NaiveDate};

/// Supplies the current date to the resolvers.
///
/// Resolution never reads the wall clock directly, so parsing the same lines
/// with the same clock always yields the same entries.
pub trait Clock {
    /// Returns today's date.
    fn today(&self) -> NaiveDate;

    /// Returns the year used for `DD.MM` and `DD. <Month>` tokens.
    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// Pins the clock to January 1st of `year`.
    ///
    /// Returns `None` if the year is outside chrono's supported range.
    pub fn year(year: i32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, 1, 1).map(Self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_year() {
        let clock = FixedClock::year(2025).unwrap();
        assert_eq!(clock.current_year(), 2025);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn system_clock_matches_local_date() {
        // Only checks the year to stay robust around midnight.
        assert_eq!(SystemClock.current_year(), Local::now().year());
    }
}
