//! Plain-text note files shared by the task and list modules.
//!
//! ```text
//! ## NOW
//! > Ship the release notes
//! - [ ] Review open PRs
//! - [x] Tag v0.3.0
//! ```

use anyhow::{Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use std::fs;
use std::path::Path;

/// Contents of `tasks.md`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    /// First `> ` line, if any.
    pub current: Option<String>,
    /// Unchecked `- [ ]` items in file order.
    pub queue: Vec<String>,
    /// Checked `- [x]` items in file order.
    pub done: Vec<String>,
}

impl TaskList {
    pub fn parse(text: &str) -> Self {
        let mut tasks = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with("## NOW") || line.starts_with("## CURRENT") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("> ") {
                if tasks.current.is_none() {
                    tasks.current = Some(rest.trim().to_string());
                }
            } else if let Some(rest) = line.strip_prefix("- [ ] ") {
                tasks.queue.push(rest.to_string());
            } else if let Some(rest) = line
                .strip_prefix("- [x] ")
                .or_else(|| line.strip_prefix("- [X] "))
            {
                tasks.done.push(rest.to_string());
            }
        }
        tasks
    }

    pub fn total(&self) -> usize {
        self.queue.len() + self.done.len()
    }
}

/// Read `tasks.md`. A missing file is an empty task list.
pub fn read_tasks(path: &Path) -> Result<TaskList> {
    if !path.exists() {
        return Ok(TaskList::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(TaskList::parse(&text))
}

/// Read a bullet list file: every non-empty, non-heading line with any
/// leading `- ` removed. A missing file is an empty list.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_list(&text))
}

fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_start_matches(['-', ' ']).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Horizontal fill bar, `width` cells wide.
pub(crate) fn bar(value: usize, max: usize, width: usize, color: Color) -> Vec<Span<'static>> {
    let filled = if max == 0 {
        0
    } else {
        (value * width / max).min(width)
    };
    vec![
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}
