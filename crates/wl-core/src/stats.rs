//! Monthly and overall aggregation of work entries.
//!
//! All functions are pure and independent of input order. Period counts are
//! the number of distinct months/ISO weeks that actually contain work, never
//! the calendar span between the first and last entry.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration};

use crate::entry::TimeEntry;

/// Duration per location label.
pub type LocationBreakdown = BTreeMap<String, Duration>;

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_duration: Duration,
    pub entry_count: usize,
    pub location_breakdown: LocationBreakdown,
}

/// Totals across a whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverallSummary {
    pub total_duration: Duration,
    /// Distinct dates with at least one entry.
    pub days_worked: usize,
    /// Distinct `(year, month)` pairs present.
    pub total_months: usize,
    /// Distinct ISO `(year, week)` pairs present.
    pub total_weeks: usize,
    /// Zero when there are no months.
    pub avg_per_month: Duration,
    /// Zero when there are no weeks.
    pub avg_per_week: Duration,
    pub location_breakdown: LocationBreakdown,
}

impl Default for OverallSummary {
    fn default() -> Self {
        Self {
            total_duration: Duration::zero(),
            days_worked: 0,
            total_months: 0,
            total_weeks: 0,
            avg_per_month: Duration::zero(),
            avg_per_week: Duration::zero(),
            location_breakdown: LocationBreakdown::new(),
        }
    }
}

/// Sum of all entry durations.
pub fn total_duration(entries: &[TimeEntry]) -> Duration {
    entries
        .iter()
        .fold(Duration::zero(), |acc, entry| acc + entry.duration())
}

fn add_to_breakdown(breakdown: &mut LocationBreakdown, entry: &TimeEntry) {
    let slot = breakdown
        .entry(entry.location_label().to_string())
        .or_insert_with(Duration::zero);
    *slot += entry.duration();
}

/// Per-month totals, sorted by `(year, month)`.
pub fn monthly_summaries(entries: &[TimeEntry]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<(i32, u32), MonthlySummary> = BTreeMap::new();

    for entry in entries {
        let date = entry.date();
        let summary = months
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthlySummary {
                year: date.year(),
                month: date.month(),
                total_duration: Duration::zero(),
                entry_count: 0,
                location_breakdown: LocationBreakdown::new(),
            });
        summary.total_duration += entry.duration();
        summary.entry_count += 1;
        add_to_breakdown(&mut summary.location_breakdown, entry);
    }

    months.into_values().collect()
}

/// Totals, distinct period counts and averages for the whole collection.
pub fn overall_summary(entries: &[TimeEntry]) -> OverallSummary {
    if entries.is_empty() {
        return OverallSummary::default();
    }

    let mut days = BTreeSet::new();
    let mut months = BTreeSet::new();
    let mut weeks = BTreeSet::new();
    let mut location_breakdown = LocationBreakdown::new();

    for entry in entries {
        let date = entry.date();
        days.insert(date);
        months.insert((date.year(), date.month()));
        let week = date.iso_week();
        weeks.insert((week.year(), week.week()));
        add_to_breakdown(&mut location_breakdown, entry);
    }

    let total = total_duration(entries);
    OverallSummary {
        total_duration: total,
        days_worked: days.len(),
        total_months: months.len(),
        total_weeks: weeks.len(),
        avg_per_month: average(total, months.len()),
        avg_per_week: average(total, weeks.len()),
        location_breakdown,
    }
}

/// Entries whose date falls in the given month, in input order.
pub fn entries_for_month(entries: &[TimeEntry], year: i32, month: u32) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|e| e.date().year() == year && e.date().month() == month)
        .cloned()
        .collect()
}

/// `total / count` at millisecond precision, or zero for an empty count.
fn average(total: Duration, count: usize) -> Duration {
    match i64::try_from(count) {
        Ok(0) | Err(_) => Duration::zero(),
        Ok(n) => Duration::milliseconds(total.num_milliseconds() / n),
    }
}
