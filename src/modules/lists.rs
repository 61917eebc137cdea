//! `loops` and `blockers`: bullet lists kept in the data directory.

use super::notes::read_list;
use super::{ContentBlock, Module, RenderContext};
use crate::ui::theme::Tone;
use anyhow::Result;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::path::{Path, PathBuf};

const LOOPS_FILE: &str = "loops.md";
const BLOCKERS_FILE: &str = "blockers.md";
const LOOPS_LIMIT: usize = 10;
const BLOCKERS_LIMIT: usize = 8;

/// Open loops: things started and not yet closed.
pub struct LoopsModule {
    path: PathBuf,
}

impl LoopsModule {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(LOOPS_FILE),
        }
    }
}

impl Module for LoopsModule {
    fn name(&self) -> &str {
        "loops"
    }

    fn render(&self, _ctx: &RenderContext) -> Result<ContentBlock> {
        let loops = read_list(&self.path)?;
        let mut lines: Vec<Line<'static>> = loops
            .iter()
            .take(LOOPS_LIMIT)
            .map(|item| {
                Line::from(vec![
                    Span::styled("  ○ ", Style::default().fg(Color::Yellow)),
                    Span::raw(item.clone()),
                ])
            })
            .collect();
        if lines.is_empty() {
            let dim = Style::default().fg(Color::DarkGray);
            lines.push(Line::styled("  No open loops.", dim));
            lines.push(Line::styled(format!("  Add to {}", self.path.display()), dim));
        }

        Ok(
            ContentBlock::new(format!("LOOPS ({})", loops.len()), Text::from(lines))
                .with_title_tone(Tone::Warn),
        )
    }
}

/// Items preventing progress. The frame blinks while any are listed.
pub struct BlockersModule {
    path: PathBuf,
}

impl BlockersModule {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(BLOCKERS_FILE),
        }
    }
}

impl Module for BlockersModule {
    fn name(&self) -> &str {
        "blockers"
    }

    fn render(&self, _ctx: &RenderContext) -> Result<ContentBlock> {
        let blockers = read_list(&self.path)?;
        let mut lines = Vec::new();

        if blockers.is_empty() {
            lines.push(Line::styled(
                "  ✓ No blockers",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                format!("  Add to {}", self.path.display()),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            lines.push(Line::styled(
                format!("  {} BLOCKER(S)", blockers.len()),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::default());
            for item in blockers.iter().take(BLOCKERS_LIMIT) {
                lines.push(Line::from(vec![
                    Span::styled("  ✗ ", Style::default().fg(Color::Red)),
                    Span::styled(item.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]));
            }
        }

        let block = ContentBlock::new("BLOCKERS", Text::from(lines));
        if blockers.is_empty() {
            Ok(block.with_border(Tone::Ok))
        } else {
            Ok(block
                .with_border(Tone::Alert)
                .with_blink(Tone::Color(Color::Red)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(frame: u64) -> RenderContext {
        RenderContext::new(Arc::new(Profile::default()), frame)
    }

    #[test]
    fn test_loops_title_counts_items() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join(LOOPS_FILE), "- one\n- two\n").expect("write");

        let block = LoopsModule::new(temp_dir.path())
            .render(&ctx(0))
            .expect("render");
        assert_eq!(block.title, "LOOPS (2)");
        assert!(block.plain_body().contains("○ two"));
    }

    #[test]
    fn test_blockers_blink_between_alert_tones() {
        let temp_dir = TempDir::new().expect("create temp dir");
        fs::write(temp_dir.path().join(BLOCKERS_FILE), "- waiting on review\n").expect("write");
        let module = BlockersModule::new(temp_dir.path());

        let block = module.render(&ctx(5)).expect("render");
        assert_eq!(block.border_at(true), Tone::Alert);
        assert_eq!(block.border_at(false), Tone::Color(Color::Red));
        assert!(block.plain_body().contains("1 BLOCKER(S)"));
    }

    #[test]
    fn test_no_blockers_is_steady() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let module = BlockersModule::new(temp_dir.path());

        for frame in 0..4 {
            let block = module.render(&ctx(frame)).expect("render");
            assert_eq!(block.border_at(frame % 2 == 0), Tone::Ok);
        }
    }
}
