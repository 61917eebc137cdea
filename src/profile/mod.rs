//! # Profile Module
//!
//! A profile is the named configuration selected at startup. It decides which
//! widgets appear on the dashboard, how they are placed, and how often their
//! data is refreshed.
//!
//! ## File Format
//!
//! Profiles are TOML files named `<profile>.toml` inside the profiles
//! directory:
//!
//! ```toml
//! name = "Deep Work"
//! description = "one task, no noise"
//! color = "bright_magenta"
//! refresh = 10
//!
//! # auto-grid placement
//! columns = 2
//! wide = ["focus"]
//! modules = ["focus", "queue", "loops", "git"]
//!
//! # structured placement (takes precedence when present)
//! left_ratio = 2
//! right_ratio = 3
//! [layout]
//! left = ["focus", ["queue", "loops"]]
//! right = ["git", "services"]
//! ```

mod error;
mod schema;
mod store;

pub use error::ProfileError;
pub use schema::{
    Cell, Profile, StructuredLayout, DEFAULT_COLOR, DEFAULT_COLUMNS, DEFAULT_LEFT_RATIO,
    DEFAULT_MODULE_TIMEOUT, DEFAULT_REFRESH, DEFAULT_RIGHT_RATIO,
};
pub use store::{ProfileStore, ProfileSummary, PROFILE_EXTENSION};
