//! `focus` and `queue`: views over `tasks.md`.

use super::notes::{bar, read_tasks};
use super::{ContentBlock, Module, RenderContext};
use crate::ui::theme::Tone;
use anyhow::Result;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::path::{Path, PathBuf};

const TASKS_FILE: &str = "tasks.md";
const QUEUE_LIMIT: usize = 8;
const RECENT_DONE: usize = 3;

/// The current task, large, plus overall progress.
pub struct FocusModule {
    tasks: PathBuf,
}

impl FocusModule {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            tasks: data_dir.join(TASKS_FILE),
        }
    }
}

impl Module for FocusModule {
    fn name(&self) -> &str {
        "focus"
    }

    fn render(&self, ctx: &RenderContext) -> Result<ContentBlock> {
        let tasks = read_tasks(&self.tasks)?;
        let accent = ctx.accent();
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        match &tasks.current {
            Some(current) => {
                lines.push(Line::styled(
                    "NOW",
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ));
                lines.push(Line::styled(
                    format!("  {current}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            None => {
                lines.push(Line::styled("No current task set.", dim));
                lines.push(Line::styled(
                    format!("  Add a '> task' line to {}", self.tasks.display()),
                    dim,
                ));
            }
        }

        let total = tasks.total();
        if total > 0 {
            let done = tasks.done.len();
            let pct = done * 100 / total;
            let mut spans = vec![Span::raw(format!("  {done}/{total} done  "))];
            spans.extend(bar(done, total, 10, Color::Green));
            spans.push(Span::raw(format!("  {pct}%")));
            lines.push(Line::default());
            lines.push(Line::from(spans));
        }

        Ok(ContentBlock::new("◇ FOCUS", Text::from(lines)).with_border(Tone::Accent))
    }
}

/// Open items in order, with the most recently finished ones above.
pub struct QueueModule {
    tasks: PathBuf,
}

impl QueueModule {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            tasks: data_dir.join(TASKS_FILE),
        }
    }
}

impl Module for QueueModule {
    fn name(&self) -> &str {
        "queue"
    }

    fn render(&self, ctx: &RenderContext) -> Result<ContentBlock> {
        let tasks = read_tasks(&self.tasks)?;
        let mut lines = Vec::new();

        let skip = tasks.done.len().saturating_sub(RECENT_DONE);
        for item in tasks.done.iter().skip(skip) {
            lines.push(Line::styled(
                format!("  ✓ {item}"),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT),
            ));
        }
        for (i, item) in tasks.queue.iter().take(QUEUE_LIMIT).enumerate() {
            let line = if i == 0 {
                Line::styled(
                    format!("  ▸ {item}"),
                    Style::default()
                        .fg(ctx.accent())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(format!("  ○ {item}"))
            };
            lines.push(line);
        }
        if lines.is_empty() {
            lines.push(Line::styled(
                format!("  No tasks. Add to {}", self.tasks.display()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        Ok(ContentBlock::new("QUEUE", Text::from(lines)))
    }
}
