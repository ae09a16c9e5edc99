//! CLI subcommand implementations.

pub mod input;
pub mod merge;
pub mod parse;
pub mod report;
pub mod util;
