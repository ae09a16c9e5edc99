//! Line classification and entry assembly.
//!
//! A work log is a flat sequence of lines such as
//!
//! ```text
//! 30.6.25
//! 9:00 - 12:00
//! C
//! Besprechung Projekt Struktur
//! ```
//!
//! Each line is classified (date, time range, location, month header or
//! description) and folded left to right through an explicit state machine:
//!
//! - `AwaitingDate`: no valid date seen yet.
//! - `AwaitingRange`: a date is known but no entry is open.
//! - `BuildingEntry`: a range opened an entry that collects location and
//!   description lines until the next range or the end of input. A date line
//!   in between only changes the date used by the next range.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::config::{ParseMode, ParserConfig};
use crate::date::DateResolver;
use crate::entry::{TimeEntry, UNKNOWN_LOCATION_LABEL};
use crate::error::{ConfigError, ParseError};
use crate::time_range::TimeRangeResolver;

/// What a single line means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Date,
    TimeRange,
    Location,
    MonthHeader,
    Description,
}

impl LineKind {
    /// Matchers in the order they are tried. Anything none of them
    /// recognizes is a description.
    pub const PRIORITY: [Self; 4] = [
        Self::Date,
        Self::TimeRange,
        Self::Location,
        Self::MonthHeader,
    ];
}

/// Entries built from a line sequence, plus the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub entries: Vec<TimeEntry>,
    /// Empty in strict mode, since the first error aborts parsing.
    pub errors: Vec<ParseError>,
}

/// An entry whose range is known but whose trailing lines are still coming.
#[derive(Debug)]
struct PendingEntry {
    entry: TimeEntry,
    has_location: bool,
    description: Vec<String>,
}

impl PendingEntry {
    fn finish(mut self) -> TimeEntry {
        self.entry.set_description(self.description.join("\n"));
        self.entry
    }
}

#[derive(Debug)]
enum ParseState {
    AwaitingDate,
    AwaitingRange { date: NaiveDate },
    BuildingEntry { date: NaiveDate, pending: PendingEntry },
}

impl ParseState {
    const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::AwaitingDate => None,
            Self::AwaitingRange { date } | Self::BuildingEntry { date, .. } => Some(*date),
        }
    }

    /// Closes the open entry, if any.
    fn finish(self) -> Option<TimeEntry> {
        match self {
            Self::BuildingEntry { pending, .. } => Some(pending.finish()),
            Self::AwaitingDate | Self::AwaitingRange { .. } => None,
        }
    }
}

/// Result of feeding one line to the state machine.
#[derive(Debug)]
struct Step {
    state: ParseState,
    emitted: Option<TimeEntry>,
    error: Option<ParseError>,
}

impl Step {
    const fn to(state: ParseState) -> Self {
        Self {
            state,
            emitted: None,
            error: None,
        }
    }

    fn emitting(mut self, entry: Option<TimeEntry>) -> Self {
        self.emitted = entry;
        self
    }

    fn failing(mut self, error: ParseError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Turns line sequences into [`TimeEntry`] values.
#[derive(Debug, Clone)]
pub struct LineClassifier<'a> {
    config: &'a ParserConfig,
    dates: DateResolver<'a>,
    ranges: TimeRangeResolver,
}

impl<'a> LineClassifier<'a> {
    pub fn new(config: &'a ParserConfig, clock: &impl Clock) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            dates: DateResolver::new(config, clock),
            ranges: TimeRangeResolver::from_config(config)?,
        })
    }

    /// Classifies a trimmed line. The first matching kind in
    /// [`LineKind::PRIORITY`] wins.
    pub fn classify(&self, line: &str) -> LineKind {
        LineKind::PRIORITY
            .into_iter()
            .find(|kind| self.recognizes(*kind, line))
            .unwrap_or(LineKind::Description)
    }

    fn recognizes(&self, kind: LineKind, line: &str) -> bool {
        match kind {
            LineKind::Date => self.dates.matches(line),
            LineKind::TimeRange => self.ranges.matches(line),
            LineKind::Location => self.config.location(line).is_some(),
            LineKind::MonthHeader => self.is_month_header(line),
            LineKind::Description => true,
        }
    }

    /// A month name, optionally followed by a four-digit year ("Juli 2025").
    fn is_month_header(&self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let (Some(name), year, None) = (words.next(), words.next(), words.next()) else {
            return false;
        };
        self.config.month(name).is_some()
            && year.is_none_or(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Folds `lines` into entries.
    ///
    /// Lines are trimmed and blank lines skipped; line numbers in errors are
    /// 1-based positions in the original sequence. In lenient mode offending
    /// lines are skipped and reported in [`ParseOutcome::errors`]; in strict
    /// mode the first one is returned as the error.
    pub fn parse<I, S>(&self, lines: I) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut outcome = ParseOutcome::default();
        let mut seen_any = false;

        let last = lines.into_iter().enumerate().try_fold(
            ParseState::AwaitingDate,
            |state, (idx, raw)| {
                let text = raw.as_ref().trim();
                if text.is_empty() {
                    return Ok(state);
                }
                seen_any = true;

                let step = self.step(state, idx + 1, text);
                outcome.entries.extend(step.emitted);
                if let Some(err) = step.error {
                    if self.config.mode == ParseMode::Strict {
                        return Err(err);
                    }
                    tracing::warn!(%err, "skipping line");
                    outcome.errors.push(err);
                }
                Ok(step.state)
            },
        )?;

        if !seen_any {
            return Err(ParseError::EmptyInput);
        }
        outcome.entries.extend(last.finish());

        tracing::debug!(
            entries = outcome.entries.len(),
            errors = outcome.errors.len(),
            "parsed work log"
        );
        Ok(outcome)
    }

    fn step(&self, state: ParseState, line: usize, text: &str) -> Step {
        let kind = self.classify(text);
        tracing::trace!(line, ?kind, text, "classified line");

        match kind {
            // A date only moves the current date; an open entry keeps its own
            // date and stays open until the next range or the end of input.
            LineKind::Date => match self.dates.resolve(text) {
                Ok(date) => match state {
                    ParseState::BuildingEntry { pending, .. } => {
                        Step::to(ParseState::BuildingEntry { date, pending })
                    }
                    ParseState::AwaitingDate | ParseState::AwaitingRange { .. } => {
                        Step::to(ParseState::AwaitingRange { date })
                    }
                },
                Err(err) => Step::to(state).failing(ParseError::at_line(line, err)),
            },

            LineKind::TimeRange => {
                let Some(date) = state.date() else {
                    return Step::to(state).failing(ParseError::MissingDate {
                        line,
                        token: text.to_string(),
                    });
                };
                let emitted = state.finish();
                match self.open_entry(date, line, text) {
                    Ok(pending) => {
                        Step::to(ParseState::BuildingEntry { date, pending }).emitting(emitted)
                    }
                    Err(err) => Step::to(ParseState::AwaitingRange { date })
                        .emitting(emitted)
                        .failing(err),
                }
            }

            LineKind::Location => match (state, self.config.location(text)) {
                (ParseState::BuildingEntry { date, mut pending }, Some((code, label))) => {
                    if pending.has_location {
                        tracing::warn!(
                            line,
                            previous = pending.entry.location_code(),
                            code,
                            "entry already has a location, replacing it"
                        );
                    }
                    pending.entry.attach_location(code, label);
                    pending.has_location = true;
                    Step::to(ParseState::BuildingEntry { date, pending })
                }
                (state, _) => Step::to(state).failing(ParseError::OrphanLocation {
                    line,
                    token: text.to_string(),
                }),
            },

            LineKind::MonthHeader => Step::to(state),

            LineKind::Description => match state {
                ParseState::BuildingEntry { date, mut pending } => {
                    pending.description.push(text.to_string());
                    Step::to(ParseState::BuildingEntry { date, pending })
                }
                state => Step::to(state).failing(ParseError::OrphanDescription {
                    line,
                    token: text.to_string(),
                }),
            },
        }
    }

    fn open_entry(&self, date: NaiveDate, line: usize, text: &str) -> Result<PendingEntry, ParseError> {
        let (start, end) = self
            .ranges
            .resolve(text, date)
            .map_err(|err| ParseError::at_line(line, err))?;
        let entry = TimeEntry::new(date, start, end, "", UNKNOWN_LOCATION_LABEL, "").map_err(|err| {
            ParseError::InvalidTimeRange {
                line,
                token: text.to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(PendingEntry {
            entry,
            has_location: false,
            description: Vec::new(),
        })
    }
}
