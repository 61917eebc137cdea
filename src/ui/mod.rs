//! # UI Module
//!
//! Terminal presentation for mirrordash.
//!
//! ## Components
//!
//! - [`theme`] - Built-in palettes and semantic tones
//! - [`config`] - User configuration (`config.json`)
//! - [`mod@render`] - Painting a screen tree with ratatui
//! - [`input`] - Keyboard events and quit keys
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    Header                        │
//! ├─────────────────────┬───────────────────────────┤
//! │                     │                           │
//! │   module            │      module               │
//! │                     ├───────────────────────────┤
//! │                     │      module               │
//! │                     │                           │
//! └─────────────────────┴───────────────────────────┘
//! ```
//!
//! The header band has a fixed height; everything below it is shared by
//! weight according to the profile.

pub mod config;
pub mod input;
pub mod render;
pub mod theme;

pub use config::Config;
pub use input::{is_quit, CrosstermEventReader, EventReader};
pub use render::{render, BufferSurface, TerminalSurface};
pub use theme::{Palette, Theme, Tone};
