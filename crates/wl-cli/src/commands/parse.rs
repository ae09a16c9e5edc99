//! `wl parse`: print the entries found in a work log.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use wl_core::stats::total_duration;
use wl_core::{Clock, ParserConfig, TimeEntry, find_overlaps};

use super::input::parse_source;
use super::util::format_duration;

/// Formats entries as one line each, descriptions indented below.
pub fn format_entries(entries: &[TimeEntry]) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        writeln!(output, "No entries found.").unwrap();
        return output;
    }

    for entry in entries {
        writeln!(output, "{entry}  ({})", format_duration(entry.duration())).unwrap();
        for line in entry.description().lines() {
            writeln!(output, "    {line}").unwrap();
        }
    }

    writeln!(output).unwrap();
    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    writeln!(
        output,
        "{} {noun}, {} total",
        entries.len(),
        format_duration(total_duration(entries))
    )
    .unwrap();
    output
}

/// Runs the parse command.
pub fn run(path: Option<&Path>, config: &ParserConfig, clock: &impl Clock, json: bool) -> Result<()> {
    let outcome = parse_source(path, config, clock)?;
    for (first, second) in find_overlaps(&outcome.entries) {
        eprintln!("warning: {first} overlaps {second}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.entries)?);
    } else {
        print!("{}", format_entries(&outcome.entries));
    }
    Ok(())
}
