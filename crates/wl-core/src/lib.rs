//! Core domain logic for the work log.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing: classifying free-form log lines and assembling time entries
//! - Statistics: monthly and overall totals per location
//! - Merging: combining entry collections without duplicates, reporting overlaps

pub mod classify;
pub mod clock;
pub mod config;
mod date;
mod entry;
mod error;
pub mod merge;
pub mod stats;
mod tabular;
mod time_range;

pub use classify::{LineClassifier, LineKind, ParseOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ParseMode, ParserConfig};
pub use date::DateResolver;
pub use entry::{EntryError, TimeEntry, UNKNOWN_LOCATION_LABEL};
pub use error::{ConfigError, ParseError, ResolveError};
pub use merge::{
    Conflict, DivergentDuplicate, MergeConfig, MergeOutcome, MergeReport, find_overlaps,
    merge_entries, merge_many,
};
pub use stats::{MonthlySummary, OverallSummary, monthly_summaries, overall_summary};
pub use tabular::{TabularRow, rows_to_lines};
pub use time_range::TimeRangeResolver;
