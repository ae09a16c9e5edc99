//! Flattening spreadsheet-style rows into classifier input.
//!
//! A tabular source has one row per block with the columns date, hours,
//! location and info. Each non-empty cell becomes a line in that column
//! order, so the rows can be fed to [`crate::LineClassifier::parse`] like any
//! other line stream. A row with an empty date cell continues the previous
//! row's date.

use serde::{Deserialize, Serialize};

/// One row of a tabular work log. Column names follow the German export
/// (`Datum`, `Stunden`, `Ort`, `Info`) as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularRow {
    #[serde(alias = "Datum")]
    pub date: String,
    #[serde(alias = "Stunden")]
    pub hours: String,
    #[serde(alias = "Ort")]
    pub location: String,
    #[serde(alias = "Info")]
    pub info: String,
}

impl TabularRow {
    /// Lines of this row, in column order, skipping blank cells and blank
    /// lines inside multi-line cells.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [&self.date, &self.hours, &self.location, &self.info]
            .into_iter()
            .flat_map(|cell| cell.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Flattens rows into classifier lines.
pub fn rows_to_lines(rows: &[TabularRow]) -> Vec<String> {
    rows.iter()
        .flat_map(TabularRow::lines)
        .map(str::to_string)
        .collect()
}
