//! Tracing initialization.
//!
//! Log records go to `<data dir>/mirrordash.log`, never to the terminal, so
//! the dashboard screen is not disturbed.

use crate::ui::Config;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `log_level` from the config.
pub const LOG_ENV: &str = "MIRRORDASH_LOG";

pub const LOG_FILE: &str = "mirrordash.log";

/// Install the global subscriber. Returns the log file path on success.
///
/// # Filter Resolution
///
/// 1. `MIRRORDASH_LOG` if set and valid
/// 2. `config.log_level`
/// 3. `"info"`
///
/// Logging is optional: if the directory or file cannot be created, or a
/// subscriber is already installed, this returns `None` and the dashboard
/// runs without logs.
pub fn init(config: &Config, data_dir: &Path) -> Option<PathBuf> {
    if std::fs::create_dir_all(data_dir).is_err() {
        return None;
    }
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(path)
}

fn filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
