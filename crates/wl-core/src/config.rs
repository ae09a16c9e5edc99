//! Parser configuration: location codes, month names and separators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the classifier reacts to a line it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip the line, record the error and keep going.
    #[default]
    Lenient,
    /// Abort on the first error.
    Strict,
}

/// Shortest month-name prefix accepted as an abbreviation.
const MIN_MONTH_PREFIX: usize = 3;

/// Configuration consumed by the resolvers and the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Error policy. Default: lenient.
    pub mode: ParseMode,

    /// Characters accepted between the two times of a range.
    /// Default: hyphen, en dash, em dash.
    pub time_separators: Vec<char>,

    /// Location code to display label (codes match case-insensitively).
    pub locations: BTreeMap<String, String>,

    /// Month name or abbreviation to month number (1-12).
    pub month_names: BTreeMap<String, u32>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let locations = [
            ("C", "Company"),
            ("H", "Homeoffice"),
            ("B", "Business Trip"),
            ("T", "Training"),
        ]
        .into_iter()
        .map(|(code, label)| (code.to_string(), label.to_string()))
        .collect();

        let month_table: [(u32, &[&str]); 12] = [
            (1, &["January", "Jan", "Januar"]),
            (2, &["February", "Feb", "Februar"]),
            (3, &["March", "Mar", "März", "Maerz"]),
            (4, &["April", "Apr"]),
            (5, &["May", "Mai"]),
            (6, &["June", "Jun", "Juni"]),
            (7, &["July", "Jul", "Juli"]),
            (8, &["August", "Aug"]),
            (9, &["September", "Sep", "Sept"]),
            (10, &["October", "Oct", "Oktober", "Okt"]),
            (11, &["November", "Nov"]),
            (12, &["December", "Dec", "Dezember", "Dez"]),
        ];
        let month_names = month_table
            .into_iter()
            .flat_map(|(month, names)| names.iter().map(move |name| ((*name).to_string(), month)))
            .collect();

        Self {
            mode: ParseMode::Lenient,
            time_separators: vec!['-', '–', '—'],
            locations,
            month_names,
        }
    }
}

impl ParserConfig {
    /// Returns a copy with the given error policy.
    #[must_use]
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Looks up a location code, ignoring case.
    ///
    /// Returns the code as configured together with its label.
    pub fn location(&self, token: &str) -> Option<(&str, &str)> {
        self.locations
            .get_key_value(token)
            .or_else(|| {
                let needle: Vec<char> = token.chars().flat_map(char::to_lowercase).collect();
                self.locations.iter().find(|(code, _)| {
                    code.chars()
                        .flat_map(char::to_lowercase)
                        .eq(needle.iter().copied())
                })
            })
            .map(|(code, label)| (code.as_str(), label.as_str()))
    }

    /// Resolves a month name to its number.
    ///
    /// Matching ignores case and a trailing `.`. Besides the configured names,
    /// any prefix of at least three letters is accepted as long as every name
    /// it prefixes belongs to the same month ("Sept", "Dez", "Mär").
    pub fn month(&self, token: &str) -> Option<u32> {
        let needle = token.trim().trim_end_matches('.').to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let valid = || {
            self.month_names
                .iter()
                .filter(|(_, month)| (1..=12).contains(*month))
                .map(|(name, month)| (name.to_lowercase(), *month))
        };

        if let Some((_, month)) = valid().find(|(name, _)| *name == needle) {
            return Some(month);
        }

        if needle.chars().count() < MIN_MONTH_PREFIX {
            return None;
        }

        let mut candidates = valid()
            .filter(|(name, _)| name.starts_with(&needle))
            .map(|(_, month)| month);
        let first = candidates.next()?;
        candidates.all(|month| month == first).then_some(first)
    }
}
