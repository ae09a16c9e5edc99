//! Report command for monthly and overall work totals.
//!
//! This module implements `wl report`, optionally restricted to one month
//! (--month YYYY-MM), with human-readable or JSON output.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use wl_core::stats::{LocationBreakdown, entries_for_month};
use wl_core::{
    Clock, MonthlySummary, OverallSummary, ParserConfig, TimeEntry, monthly_summaries,
    overall_summary,
};

use super::input::parse_source;
use super::util::{decimal_hours, format_duration};

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub months: Vec<MonthlySummary>,
    pub overall: OverallSummary,
}

impl ReportData {
    pub fn from_entries(entries: &[TimeEntry]) -> Self {
        Self {
            months: monthly_summaries(entries),
            overall: overall_summary(entries),
        }
    }
}

/// "June 2025"; falls back to "2025-06" for out-of-range values.
fn month_title(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1).map_or_else(
        || format!("{year:04}-{month:02}"),
        |date| date.format("%B %Y").to_string(),
    )
}

fn write_breakdown(output: &mut String, breakdown: &LocationBreakdown, indent: &str) {
    // Largest first, ties alphabetical.
    let mut rows: Vec<_> = breakdown.iter().collect();
    rows.sort_by_key(|(label, duration)| (std::cmp::Reverse(**duration), *label));
    for (label, duration) in rows {
        writeln!(output, "{indent}{label:<16}{:>8}", format_duration(*duration)).unwrap();
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(output, "WORK REPORT").unwrap();

    if data.months.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No entries found.").unwrap();
        return output;
    }

    // BY MONTH section
    writeln!(output).unwrap();
    writeln!(output, "BY MONTH").unwrap();
    writeln!(output, "────────").unwrap();
    for month in &data.months {
        let noun = if month.entry_count == 1 { "entry" } else { "entries" };
        writeln!(
            output,
            "{:<18}{:>8}  ({} {noun})",
            month_title(month.year, month.month),
            format_duration(month.total_duration),
            month.entry_count
        )
        .unwrap();
        write_breakdown(&mut output, &month.location_breakdown, "  ");
    }

    // BY LOCATION section
    writeln!(output).unwrap();
    writeln!(output, "BY LOCATION").unwrap();
    writeln!(output, "───────────").unwrap();
    write_breakdown(&mut output, &data.overall.location_breakdown, "");

    // SUMMARY section
    let overall = &data.overall;
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Total worked:   {}", format_duration(overall.total_duration)).unwrap();
    writeln!(output, "Days worked:    {}", overall.days_worked).unwrap();
    writeln!(output, "Months:         {}", overall.total_months).unwrap();
    writeln!(output, "Weeks:          {}", overall.total_weeks).unwrap();
    writeln!(output, "Avg per month:  {}", format_duration(overall.avg_per_month)).unwrap();
    writeln!(output, "Avg per week:   {}", format_duration(overall.avg_per_week)).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub months: Vec<JsonMonth>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonMonth {
    /// `YYYY-MM`
    pub month: String,
    pub total_minutes: i64,
    pub total_hours: f64,
    pub entry_count: usize,
    pub by_location: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub total_minutes: i64,
    pub total_hours: f64,
    pub days_worked: usize,
    pub months: usize,
    pub weeks: usize,
    pub avg_minutes_per_month: i64,
    pub avg_minutes_per_week: i64,
    pub by_location: BTreeMap<String, i64>,
}

fn minutes_by_location(breakdown: &LocationBreakdown) -> BTreeMap<String, i64> {
    breakdown
        .iter()
        .map(|(label, duration)| (label.clone(), duration.num_minutes()))
        .collect()
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let overall = &data.overall;
    let report = JsonReport {
        months: data
            .months
            .iter()
            .map(|m| JsonMonth {
                month: format!("{:04}-{:02}", m.year, m.month),
                total_minutes: m.total_duration.num_minutes(),
                total_hours: decimal_hours(m.total_duration),
                entry_count: m.entry_count,
                by_location: minutes_by_location(&m.location_breakdown),
            })
            .collect(),
        totals: JsonTotals {
            total_minutes: overall.total_duration.num_minutes(),
            total_hours: decimal_hours(overall.total_duration),
            days_worked: overall.days_worked,
            months: overall.total_months,
            weeks: overall.total_weeks,
            avg_minutes_per_month: overall.avg_per_month.num_minutes(),
            avg_minutes_per_week: overall.avg_per_week.num_minutes(),
            by_location: minutes_by_location(&overall.location_breakdown),
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(
    path: Option<&Path>,
    config: &ParserConfig,
    clock: &impl Clock,
    month: Option<(i32, u32)>,
    json: bool,
) -> Result<()> {
    let outcome = parse_source(path, config, clock)?;
    let entries = match month {
        Some((year, month)) => entries_for_month(&outcome.entries, year, month),
        None => outcome.entries,
    };
    let data = ReportData::from_entries(&entries);
    tracing::debug!(
        entries = entries.len(),
        total = %format_duration(data.overall.total_duration),
        "computed report"
    );

    if json {
        println!("{}", format_report_json(&data)?);
    } else {
        print!("{}", format_report(&data));
    }

    Ok(())
}
