//! Error types for profile loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong before the scheduler starts.
///
/// All variants are fatal at startup: the binary reports them and exits with
/// a non-zero status.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No `<name>.toml` exists in the profiles directory.
    #[error("Profile not found: {name}")]
    NotFound {
        name: String,
        /// Stems of the profiles that do exist, sorted.
        available: Vec<String>,
    },

    /// The profile file exists but could not be read.
    #[error("Failed to read profile {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile is not valid TOML or does not match the schema.
    #[error("Failed to parse profile {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The profile parsed but one of its values is out of range.
    #[error("Invalid profile {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}
