//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Work log parser.
///
/// Turns free-form work notes (dates, time ranges, location codes and
/// descriptions on separate lines) into time entries, reports on them and
/// merges them into a JSON entry store.
#[derive(Debug, Parser)]
#[command(name = "wl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Year assumed for dates written without one (default: current year).
    #[arg(short, long, global = true)]
    pub year: Option<i32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a work log and print the entries.
    Parse {
        /// Work log to read (stdin if omitted). `.json` files are read as
        /// tabular rows.
        file: Option<PathBuf>,

        /// Abort on the first unusable line.
        #[arg(long)]
        strict: bool,

        /// Output entries as JSON (usable as a merge store).
        #[arg(long)]
        json: bool,
    },

    /// Show monthly and overall totals for a work log.
    Report {
        /// Work log to read (stdin if omitted).
        file: Option<PathBuf>,

        /// Abort on the first unusable line.
        #[arg(long)]
        strict: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Only report this month (YYYY-MM).
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },

    /// Merge work logs into a JSON entry store.
    Merge {
        /// Entry store to merge into. Created if missing.
        #[arg(long)]
        existing: PathBuf,

        /// Work logs to merge, in order (stdin if none).
        files: Vec<PathBuf>,

        /// Where to write the merged store (default: overwrite --existing).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort on the first unusable line.
        #[arg(long)]
        strict: bool,

        /// Output the merge report as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Parses `YYYY-MM` into `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("invalid month '{s}', expected YYYY-MM");
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-06"), Ok((2025, 6)));
        assert_eq!(parse_month("2025-6"), Ok((2025, 6)));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025").is_err());
        assert!(parse_month("june").is_err());
    }

    #[test]
    fn test_cli_parses_merge_arguments() {
        let cli = Cli::parse_from([
            "wl", "--year", "2025", "merge", "--existing", "store.json", "a.txt", "b.txt",
        ]);
        assert_eq!(cli.year, Some(2025));
        let Some(Commands::Merge { existing, files, output, .. }) = cli.command else {
            panic!("expected merge command");
        };
        assert_eq!(existing, PathBuf::from("store.json"));
        assert_eq!(files, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(output.is_none());
    }

    #[test]
    fn test_cli_report_month_flag() {
        let cli = Cli::parse_from(["wl", "report", "log.txt", "--month", "2025-07"]);
        let Some(Commands::Report { month, .. }) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(month, Some((2025, 7)));
    }
}
