//! Reading work logs from files or stdin and turning them into entries.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use wl_core::{Clock, LineClassifier, ParseOutcome, ParserConfig, TabularRow, rows_to_lines};

/// Reads all lines of a work log.
fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
    reader
        .lines()
        .enumerate()
        .map(|(idx, line)| line.with_context(|| format!("failed to read line {}", idx + 1)))
        .collect()
}

/// Reads a JSON array of tabular rows and flattens it into lines.
fn read_tabular<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let rows: Vec<TabularRow> =
        serde_json::from_reader(reader).context("invalid tabular JSON")?;
    Ok(rows_to_lines(&rows))
}

/// Reads lines from `path`, or from stdin when no path is given.
///
/// Files with a `.json` extension are read as tabular rows.
pub fn load_lines(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return read_lines(io::stdin().lock()).context("failed to read stdin");
    };

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let is_tabular = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_tabular {
        read_tabular(reader).with_context(|| format!("failed to read {}", path.display()))
    } else {
        read_lines(reader).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Parses a work log, printing skipped lines to stderr.
///
/// In strict mode the first unusable line is returned as an error.
pub fn parse_source(
    path: Option<&Path>,
    config: &ParserConfig,
    clock: &impl Clock,
) -> Result<ParseOutcome> {
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    let lines = load_lines(path)?;
    tracing::debug!(source = %source, lines = lines.len(), "read work log");

    let classifier = LineClassifier::new(config, clock).context("invalid parser configuration")?;
    let outcome = classifier
        .parse(lines)
        .with_context(|| format!("failed to parse {source}"))?;

    for error in &outcome.errors {
        eprintln!("warning: {source}: {error}");
    }
    Ok(outcome)
}
