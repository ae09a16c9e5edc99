//! `wl merge`: fold parsed work logs into a JSON entry store.
//!
//! The store is a pretty-printed JSON array of entries, the same shape
//! `wl parse --json` prints. A missing store counts as empty.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use wl_core::{Clock, MergeConfig, MergeReport, ParserConfig, TimeEntry, merge_many};

use super::input::parse_source;

/// Loads an entry store, treating a missing file as empty.
pub fn load_store(path: &Path) -> Result<Vec<TimeEntry>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "entry store does not exist yet");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).with_context(|| format!("invalid entry store {}", path.display()))
}

/// Writes an entry store, creating parent directories as needed.
pub fn save_store(path: &Path, entries: &[TimeEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json + "\n").with_context(|| format!("failed to write {}", path.display()))
}

/// Formats the merge summary for humans.
pub fn format_merge_report(report: &MergeReport) -> String {
    let mut output = String::new();

    writeln!(output, "MERGE SUMMARY").unwrap();
    writeln!(output, "─────────────").unwrap();
    writeln!(output, "Entries before:      {}", report.before_count).unwrap();
    writeln!(output, "Entries after:       {}", report.after_count).unwrap();
    writeln!(output, "Added:               {}", report.added_count).unwrap();
    writeln!(output, "Duplicates removed:  {}", report.duplicates_removed_count).unwrap();
    writeln!(output, "Conflicts:           {}", report.conflicts.len()).unwrap();

    if !report.conflicts.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "CONFLICTS").unwrap();
        writeln!(output, "─────────").unwrap();
        for conflict in &report.conflicts {
            writeln!(output, "{}", conflict.existing).unwrap();
            writeln!(output, "  overlaps {}", conflict.incoming).unwrap();
        }
    }

    if !report.divergent_descriptions.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "DIVERGENT DESCRIPTIONS").unwrap();
        writeln!(output, "──────────────────────").unwrap();
        for divergent in &report.divergent_descriptions {
            writeln!(
                output,
                "{}  (similarity {:.2})",
                divergent.kept, divergent.similarity
            )
            .unwrap();
            writeln!(output, "  kept:    {}", one_line(divergent.kept.description())).unwrap();
            writeln!(output, "  dropped: {}", one_line(divergent.dropped.description())).unwrap();
        }
    }

    output
}

fn one_line(description: &str) -> String {
    description.lines().collect::<Vec<_>>().join(" / ")
}

// ========== JSON Output ==========

#[derive(Debug, Serialize)]
pub struct JsonMergeReport<'a> {
    pub before_count: usize,
    pub after_count: usize,
    pub added_count: usize,
    pub duplicates_removed_count: usize,
    pub conflicts: Vec<JsonConflict<'a>>,
    pub divergent_descriptions: Vec<JsonDivergent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonConflict<'a> {
    pub existing: &'a TimeEntry,
    pub incoming: &'a TimeEntry,
}

#[derive(Debug, Serialize)]
pub struct JsonDivergent<'a> {
    pub kept: &'a TimeEntry,
    pub dropped: &'a TimeEntry,
    pub similarity: f64,
}

pub fn format_merge_report_json(report: &MergeReport) -> Result<String> {
    let json = JsonMergeReport {
        before_count: report.before_count,
        after_count: report.after_count,
        added_count: report.added_count,
        duplicates_removed_count: report.duplicates_removed_count,
        conflicts: report
            .conflicts
            .iter()
            .map(|c| JsonConflict {
                existing: &c.existing,
                incoming: &c.incoming,
            })
            .collect(),
        divergent_descriptions: report
            .divergent_descriptions
            .iter()
            .map(|d| JsonDivergent {
                kept: &d.kept,
                dropped: &d.dropped,
                similarity: d.similarity,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Arguments for [`run`].
#[derive(Debug)]
pub struct MergeArgs<'a> {
    pub existing: &'a Path,
    pub files: &'a [PathBuf],
    pub output: Option<&'a Path>,
    pub json: bool,
}

/// Runs the merge command.
pub fn run(
    args: &MergeArgs<'_>,
    parser: &ParserConfig,
    merge: &MergeConfig,
    clock: &impl Clock,
) -> Result<()> {
    let existing = load_store(args.existing)?;

    let sources = if args.files.is_empty() {
        vec![parse_source(None, parser, clock)?.entries]
    } else {
        args.files
            .iter()
            .map(|file| parse_source(Some(file.as_path()), parser, clock).map(|outcome| outcome.entries))
            .collect::<Result<Vec<_>>>()?
    };

    let outcome = merge_many(&existing, &sources, merge);

    let target = args.output.unwrap_or(args.existing);
    save_store(target, &outcome.entries)?;
    tracing::debug!(path = %target.display(), entries = outcome.entries.len(), "wrote entry store");

    if args.json {
        println!("{}", format_merge_report_json(&outcome.report)?);
    } else {
        print!("{}", format_merge_report(&outcome.report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use tempfile::TempDir;
    use wl_core::{FixedClock, LineClassifier, merge_entries};

    use super::*;

    fn parse(lines: &[&str]) -> Vec<TimeEntry> {
        let config = ParserConfig::default();
        let clock = FixedClock::year(2025).unwrap();
        LineClassifier::new(&config, &clock)
            .unwrap()
            .parse(lines)
            .unwrap()
            .entries
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let temp = TempDir::new().unwrap();
        let entries = load_store(&temp.path().join("missing.json")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_store_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/store.json");
        let entries = parse(&["30.6.25", "9:00-12:00", "C", "Besprechung"]);

        save_store(&path, &entries).unwrap();
        assert_eq!(load_store(&path).unwrap(), entries);
    }

    #[test]
    fn test_load_rejects_invalid_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_store(&path).unwrap_err();
        assert!(err.to_string().contains("invalid entry store"));
    }

    #[test]
    fn test_merge_report_with_conflict() {
        let existing = parse(&["30.6.25", "9:00-12:00", "C"]);
        let incoming = parse(&["30.6.25", "10:00-11:00", "H", "9:00-12:00", "C"]);
        let outcome = merge_entries(&existing, &incoming, &MergeConfig::default());

        assert_snapshot!(format_merge_report(&outcome.report), @r"
        MERGE SUMMARY
        ─────────────
        Entries before:      1
        Entries after:       2
        Added:               1
        Duplicates removed:  1
        Conflicts:           1

        CONFLICTS
        ─────────
        2025-06-30 09:00-12:00 Company
          overlaps 2025-06-30 10:00-11:00 Homeoffice
        ");
    }

    #[test]
    fn test_merge_report_divergent_descriptions() {
        let existing = parse(&["30.6.25", "9:00-12:00", "C", "Besprechung"]);
        let incoming = parse(&["30.6.25", "9:02-12:00", "C", "Code review", "Planung"]);
        let config = MergeConfig {
            similarity_threshold: Some(0.8),
            ..MergeConfig::default()
        };
        let outcome = merge_entries(&existing, &incoming, &config);

        assert_snapshot!(format_merge_report(&outcome.report), @r"
        MERGE SUMMARY
        ─────────────
        Entries before:      1
        Entries after:       1
        Added:               0
        Duplicates removed:  1
        Conflicts:           0

        DIVERGENT DESCRIPTIONS
        ──────────────────────
        2025-06-30 09:00-12:00 Company  (similarity 0.00)
          kept:    Besprechung
          dropped: Code review / Planung
        ");
    }

    #[test]
    fn test_merge_report_json_counts() {
        let existing = parse(&["30.6.25", "9:00-12:00", "C"]);
        let outcome = merge_entries(&existing, &existing, &MergeConfig::default());
        let json: serde_json::Value =
            serde_json::from_str(&format_merge_report_json(&outcome.report).unwrap()).unwrap();

        assert_eq!(json["added_count"], 0);
        assert_eq!(json["duplicates_removed_count"], 1);
        assert_eq!(json["conflicts"].as_array().unwrap().len(), 0);
    }
}
