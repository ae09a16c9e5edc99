use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{merge, parse, report};
use wl_cli::{Cli, Commands, Config};
use wl_core::{Clock, FixedClock, SystemClock};

/// Pins the clock to `year` when given, otherwise to today.
fn clock_for(year: Option<i32>) -> Result<FixedClock> {
    match year {
        Some(year) => FixedClock::year(year).with_context(|| format!("unsupported year {year}")),
        None => Ok(FixedClock(SystemClock.today())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let clock = clock_for(cli.year)?;

    match &cli.command {
        Some(Commands::Parse { file, strict, json }) => {
            parse::run(file.as_deref(), &config.parser_config(*strict), &clock, *json)?;
        }
        Some(Commands::Report {
            file,
            strict,
            json,
            month,
        }) => {
            report::run(
                file.as_deref(),
                &config.parser_config(*strict),
                &clock,
                *month,
                *json,
            )?;
        }
        Some(Commands::Merge {
            existing,
            files,
            output,
            strict,
            json,
        }) => {
            let args = merge::MergeArgs {
                existing,
                files,
                output: output.as_deref(),
                json: *json,
            };
            merge::run(
                &args,
                &config.parser_config(*strict),
                &config.merge_config()?,
                &clock,
            )?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
