//! # User Configuration
//!
//! Reads user-wide settings from `~/.config/mirrordash/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is deserialized from a JSON file in the user's XDG
//! config directory. Every field has a default, so a missing file is the
//! same as an empty one. The file is never written back.
//!
//! ```json
//! {
//!   "default_profile": "work",
//!   "profiles_dir": "/home/me/dash/profiles",
//!   "tick_ms": 250,
//!   "log_level": "debug"
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Smallest fast-tick period accepted from the config file.
pub const MIN_TICK_MS: u64 = 10;

/// User-wide settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    #[serde(default = "default_profile_name")]
    pub default_profile: String,

    /// Directory holding `<name>.toml` profiles.
    #[serde(default)]
    pub profiles_dir: Option<PathBuf>,

    /// Fast-tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// `tracing` filter directive written to the log file.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_profile_name() -> String {
    "default".to_string()
}

fn default_tick_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            profiles_dir: None,
            tick_ms: default_tick_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the user configuration. A missing file yields the defaults; a
    /// file that cannot be parsed is an error.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Fast-tick period, clamped to [`MIN_TICK_MS`].
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(MIN_TICK_MS))
    }

    /// Return the path to the config file.
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mirrordash")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
