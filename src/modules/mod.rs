//! # Modules
//!
//! A module is a named widget that renders one region of the dashboard.
//!
//! ## Contract
//!
//! Every module implements [`Module`]: given the shared [`RenderContext`]
//! (the active profile and the current animation frame) it returns a
//! [`ContentBlock`] or an error. Modules may do their own I/O but must not
//! hold on to the context.
//!
//! ## Failure Isolation
//!
//! Modules are never called directly. The [`ModuleRegistry`] resolves a name
//! and turns every possible result into a block:
//!
//! | Outcome | Title | Body | Border |
//! |---------|-------|------|--------|
//! | rendered | module's own | module's own | module's own |
//! | unknown name | name (dim) | `module not found` | dim |
//! | `Err` or panic | name | error text | alert |
//! | over budget | name | `timed out after ...` | alert |
//! | still over budget | name | `previous render still running` | warn |
//!
//! A single broken widget therefore never takes down the rest of the screen.
//! A render that overruns its budget keeps its thread until it returns; the
//! module is not started again before then.
//!
//! ## Built-in Modules
//!
//! | Name | Source |
//! |------|--------|
//! | `focus` | `tasks.md` current task and progress |
//! | `queue` | `tasks.md` open and recently finished items |
//! | `loops` | `loops.md` open loops |
//! | `blockers` | `blockers.md`, blinks while anything is listed |
//! | `git` | branch, changes and recent commits of the working directory |
//! | `services` | TCP reachability of ports in `services.toml` |

mod git;
mod lists;
mod notes;
mod registry;
mod services;
mod tasks;

pub use git::GitModule;
pub use lists::{BlockersModule, LoopsModule};
pub use notes::{read_list, read_tasks, TaskList};
pub use registry::{
    InvocationStatus, ModuleInvocation, ModuleOutcome, ModuleRegistry, STALLED_NOTICE,
};
pub use services::ServicesModule;
pub use tasks::{FocusModule, QueueModule};

use crate::profile::Profile;
use crate::ui::theme::{parse_color, Tone};
use anyhow::Result;
use ratatui::style::Color;
use ratatui::text::Text;
use std::path::PathBuf;
use std::sync::Arc;

/// Body shown when a profile places no modules at all.
pub const NO_MODULES_NOTICE: &str = "no modules configured";

/// Body of the placeholder for an unknown module name.
pub const MODULE_NOT_FOUND: &str = "module not found";

/// A titled, bordered unit of rendered content.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub title: String,
    pub title_tone: Tone,
    pub border: Tone,
    /// Border shown on odd frames instead of `border`. Resolved at paint
    /// time, so the frame blinks on the fast clock between rebuilds.
    pub blink: Option<Tone>,
    pub body: Text<'static>,
}

impl ContentBlock {
    /// A block with an accent title and a neutral frame.
    pub fn new(title: impl Into<String>, body: impl Into<Text<'static>>) -> Self {
        Self {
            title: title.into(),
            title_tone: Tone::Accent,
            border: Tone::Neutral,
            blink: None,
            body: body.into(),
        }
    }

    pub fn with_border(mut self, tone: Tone) -> Self {
        self.border = tone;
        self
    }

    /// Alternate the border with `off` on odd frames.
    pub fn with_blink(mut self, off: Tone) -> Self {
        self.blink = Some(off);
        self
    }

    /// Border tone for a frame with the given blink parity.
    pub fn border_at(&self, blink_on: bool) -> Tone {
        match self.blink {
            Some(off) if !blink_on => off,
            _ => self.border,
        }
    }

    pub fn with_title_tone(mut self, tone: Tone) -> Self {
        self.title_tone = tone;
        self
    }

    /// Body as plain text, one line per row.
    pub fn plain_body(&self) -> String {
        self.body
            .lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Read-only view handed to every module call.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub profile: Arc<Profile>,
    /// Current animation frame, owned by the scheduler.
    pub frame: u64,
}

impl RenderContext {
    pub fn new(profile: Arc<Profile>, frame: u64) -> Self {
        Self { profile, frame }
    }

    /// Blink parity: `true` on even frames.
    pub fn blink_on(&self) -> bool {
        self.frame % 2 == 0
    }

    /// The profile accent as a concrete color, for text inside bodies.
    pub fn accent(&self) -> Color {
        parse_color(&self.profile.color).unwrap_or(Color::LightCyan)
    }
}

/// A dashboard widget.
pub trait Module: Send + Sync {
    /// Name used in profiles to place this module.
    fn name(&self) -> &str;

    /// Render the module's region for this rebuild.
    fn render(&self, ctx: &RenderContext) -> Result<ContentBlock>;
}

/// Directory the built-in modules read their files from.
///
/// `MIRRORDASH_DATA` overrides the platform data directory.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("MIRRORDASH_DATA") {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "mirrordash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".mirrordash"))
}
