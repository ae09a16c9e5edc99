//! Error types for token resolution and line classification.

use thiserror::Error;

/// A single token could not be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No date pattern matched, or the matched date does not exist.
    #[error("invalid date '{token}'")]
    InvalidDate { token: String },

    /// The token is not a valid `HH:MM - HH:MM` range.
    #[error("invalid time range '{token}': {reason}")]
    InvalidTimeRange { token: String, reason: String },
}

/// A line of input could not be folded into an entry.
///
/// Every variant except [`ParseError::EmptyInput`] carries the 1-based line
/// number and the offending text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: invalid date '{token}'")]
    InvalidDate { line: usize, token: String },

    #[error("line {line}: invalid time range '{token}': {reason}")]
    InvalidTimeRange {
        line: usize,
        token: String,
        reason: String,
    },

    /// A time range appeared before any usable date.
    #[error("line {line}: time range '{token}' has no preceding date")]
    MissingDate { line: usize, token: String },

    /// A location code appeared outside of an entry.
    #[error("line {line}: location '{token}' does not belong to any entry")]
    OrphanLocation { line: usize, token: String },

    /// Free text appeared outside of an entry.
    #[error("line {line}: description '{token}' does not belong to any entry")]
    OrphanDescription { line: usize, token: String },

    #[error("input contains no lines")]
    EmptyInput,
}

impl ParseError {
    /// Attaches a line number to a resolver failure.
    pub fn at_line(line: usize, err: ResolveError) -> Self {
        match err {
            ResolveError::InvalidDate { token } => Self::InvalidDate { line, token },
            ResolveError::InvalidTimeRange { token, reason } => Self::InvalidTimeRange {
                line,
                token,
                reason,
            },
        }
    }

    /// Returns the 1-based line number, if the error is tied to a line.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidDate { line, .. }
            | Self::InvalidTimeRange { line, .. }
            | Self::MissingDate { line, .. }
            | Self::OrphanLocation { line, .. }
            | Self::OrphanDescription { line, .. } => Some(*line),
            Self::EmptyInput => None,
        }
    }
}

/// Parser configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one time range separator is required")]
    NoSeparators,

    #[error("failed to build time range pattern: {0}")]
    Pattern(#[from] regex::Error),
}
