//! # Profile Schema
//!
//! The on-disk shape of a profile ([`RawProfile`]) and its validated,
//! immutable runtime form ([`Profile`]).

use super::error::ProfileError;
use crate::ui::theme::Theme;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Accent color used when a profile does not name one.
pub const DEFAULT_COLOR: &str = "bright_cyan";

/// Slow-clock interval used when a profile does not set `refresh`.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(15);

/// Auto-grid column count used when a profile does not set `columns`.
pub const DEFAULT_COLUMNS: usize = 2;

/// Weight of the left column in structured mode.
pub const DEFAULT_LEFT_RATIO: u16 = 2;

/// Weight of the right column in structured mode.
pub const DEFAULT_RIGHT_RATIO: u16 = 3;

/// Render budget applied to each module call unless the profile overrides it.
pub const DEFAULT_MODULE_TIMEOUT: Duration = Duration::from_millis(2000);

/// One row of a structured column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A single module spanning the full column width.
    Module(String),
    /// Several modules sharing the row in equal parts.
    Row(Vec<String>),
}

impl Cell {
    /// Module names in this cell, left to right.
    pub fn modules(&self) -> &[String] {
        match self {
            Cell::Module(name) => std::slice::from_ref(name),
            Cell::Row(names) => names,
        }
    }
}

/// Explicit two-column placement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredLayout {
    #[serde(default)]
    pub left: Vec<Cell>,
    #[serde(default)]
    pub right: Vec<Cell>,
}

impl StructuredLayout {
    /// Total number of module names across both columns.
    pub fn module_count(&self) -> usize {
        self.left
            .iter()
            .chain(&self.right)
            .map(|cell| cell.modules().len())
            .sum()
    }
}

/// Profile exactly as written in the TOML file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProfile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    color: Option<String>,
    /// Kept loose so that a non-numeric value is reported as a validation
    /// error rather than a generic type mismatch.
    #[serde(default)]
    refresh: Option<toml::Value>,
    #[serde(default)]
    columns: Option<i64>,
    #[serde(default)]
    wide: Vec<String>,
    #[serde(default)]
    modules: Vec<String>,
    #[serde(default)]
    layout: Option<StructuredLayout>,
    #[serde(default)]
    left_ratio: Option<i64>,
    #[serde(default)]
    right_ratio: Option<i64>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    module_timeout_ms: Option<u64>,
}

/// Validated, read-only configuration shared by every component for the
/// lifetime of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub description: String,
    /// Accent color name (`bright_cyan`, `magenta`, `#ff8800`, ...).
    pub color: String,
    /// Slow-clock interval between body rebuilds.
    pub refresh: Duration,
    /// Auto-grid column count, always at least 1.
    pub columns: usize,
    /// Modules that always occupy a full auto-grid row.
    pub wide: BTreeSet<String>,
    /// Auto-grid module order.
    pub modules: Vec<String>,
    /// Structured placement; takes precedence over `modules` when present.
    pub layout: Option<StructuredLayout>,
    pub left_ratio: u16,
    pub right_ratio: u16,
    /// Built-in theme name, `None` for the default theme.
    pub theme: Option<String>,
    /// Per-module render budget, `None` to wait for every render however
    /// long it takes.
    pub module_timeout: Option<Duration>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            color: DEFAULT_COLOR.to_string(),
            refresh: DEFAULT_REFRESH,
            columns: DEFAULT_COLUMNS,
            wide: BTreeSet::new(),
            modules: Vec::new(),
            layout: None,
            left_ratio: DEFAULT_LEFT_RATIO,
            right_ratio: DEFAULT_RIGHT_RATIO,
            theme: None,
            module_timeout: Some(DEFAULT_MODULE_TIMEOUT),
        }
    }
}

impl Profile {
    /// Parse and validate a profile from TOML text. `path` is only used for
    /// error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ProfileError> {
        let raw: RawProfile = toml::from_str(text).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::validate(raw).map_err(|reason| ProfileError::Invalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn validate(raw: RawProfile) -> Result<Self, String> {
        let refresh = match raw.refresh {
            None => DEFAULT_REFRESH,
            Some(value) => parse_refresh(&value)?,
        };

        let columns = match raw.columns {
            None => DEFAULT_COLUMNS,
            Some(n) if n >= 1 => usize::try_from(n).map_err(|_| "columns is too large")?,
            Some(n) => return Err(format!("columns must be at least 1, got {n}")),
        };

        let left_ratio = parse_ratio("left_ratio", raw.left_ratio, DEFAULT_LEFT_RATIO)?;
        let right_ratio = parse_ratio("right_ratio", raw.right_ratio, DEFAULT_RIGHT_RATIO)?;

        if let Some(theme) = &raw.theme {
            if Theme::by_name(theme).is_none() {
                return Err(format!("unknown theme '{theme}'"));
            }
        }

        let module_timeout = match raw.module_timeout_ms {
            None => Some(DEFAULT_MODULE_TIMEOUT),
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        };

        Ok(Self {
            name: raw.name,
            description: raw.description,
            color: raw.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            refresh,
            columns,
            wide: raw.wide.into_iter().collect(),
            modules: raw.modules,
            layout: raw.layout,
            left_ratio,
            right_ratio,
            theme: raw.theme,
            module_timeout,
        })
    }

    /// Whether this profile places modules explicitly rather than by auto-grid.
    pub fn is_structured(&self) -> bool {
        self.layout.is_some()
    }
}

fn parse_refresh(value: &toml::Value) -> Result<Duration, String> {
    let secs = match value {
        toml::Value::Integer(n) => *n as f64,
        toml::Value::Float(f) => *f,
        other => {
            return Err(format!(
                "refresh must be a number of seconds, got {}",
                other.type_str()
            ))
        }
    };
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("refresh must be a non-negative number, got {secs}"));
    }
    // Anything beyond Duration's range means "never refresh again".
    Ok(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

fn parse_ratio(key: &str, value: Option<i64>, default: u16) -> Result<u16, String> {
    match value {
        None => Ok(default),
        Some(n) if n >= 1 => u16::try_from(n).map_err(|_| format!("{key} is too large: {n}")),
        Some(n) => Err(format!("{key} must be at least 1, got {n}")),
    }
}
