//! Work log CLI library.
//!
//! This crate provides the CLI interface for the work log parser.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{Config, MergeSettings};
