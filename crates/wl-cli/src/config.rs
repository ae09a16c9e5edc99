//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wl_core::{MergeConfig, ParseMode, ParserConfig};

/// Application configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Line classification settings.
    pub parsing: ParserConfig,

    /// Duplicate detection settings.
    pub merge: MergeSettings,
}

/// The `[merge]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    /// Start/end difference still treated as the same entry.
    pub tolerance_minutes: i64,

    /// Report duplicates whose descriptions are less similar than this.
    pub similarity_threshold: Option<f64>,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            tolerance_minutes: wl_core::merge::DEFAULT_TOLERANCE_MINUTES,
            similarity_threshold: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mode", &self.parsing.mode)
            .field("time_separators", &self.parsing.time_separators)
            .field("locations", &self.parsing.locations)
            .field("month_names", &self.parsing.month_names.len())
            .field("merge", &self.merge)
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WL_*), e.g. WL_MERGE__TOLERANCE_MINUTES
        figment = figment.merge(Env::prefixed("WL_").split("__"));

        figment.extract()
    }

    /// Parser settings, forced to strict mode when `strict` is set.
    pub fn parser_config(&self, strict: bool) -> ParserConfig {
        let config = self.parsing.clone();
        if strict {
            config.with_mode(ParseMode::Strict)
        } else {
            config
        }
    }

    /// Merge settings for the core, rejecting tolerances chrono cannot hold.
    pub fn merge_config(&self) -> anyhow::Result<MergeConfig> {
        let minutes = self.merge.tolerance_minutes;
        let tolerance = Duration::try_minutes(minutes)
            .with_context(|| format!("merge.tolerance_minutes {minutes} is out of range"))?;
        Ok(MergeConfig {
            tolerance,
            similarity_threshold: self.merge.similarity_threshold,
        })
    }
}

/// Returns the platform-specific config directory for wl.
///
/// On Linux: `~/.config/wl`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wl"))
}
