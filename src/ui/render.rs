use crate::dashboard::{DisplaySurface, LayoutNode, Screen, SplitDirection};
use crate::modules::{ContentBlock, ModuleInvocation};
use crate::ui::theme::Palette;
use anyhow::Result;
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame, Terminal,
};

/// Paint a whole screen tree into the frame.
pub fn render(frame: &mut Frame, screen: &Screen, palette: &Palette) {
    let area = frame.area();
    draw_screen(frame.buffer_mut(), area, screen, palette);
}

/// Paint a screen tree into `area` of a buffer.
pub fn draw_screen(buf: &mut Buffer, area: Rect, screen: &Screen, palette: &Palette) {
    Block::default()
        .style(
            Style::default()
                .bg(palette.theme.bg)
                .fg(palette.theme.fg),
        )
        .render(area, buf);
    draw_node(buf, area, screen, palette);
}

fn draw_node(buf: &mut Buffer, area: Rect, node: &Screen, palette: &Palette) {
    match node {
        LayoutNode::Split {
            direction,
            children,
            ratios,
        } => {
            if children.is_empty() {
                return;
            }
            let constraints: Vec<Constraint> = children
                .iter()
                .enumerate()
                .map(|(i, child)| match child {
                    LayoutNode::Fixed { height, .. } => Constraint::Length(*height),
                    _ => {
                        let weight = ratios
                            .as_ref()
                            .and_then(|r| r.get(i).copied())
                            .unwrap_or(1);
                        Constraint::Fill(weight)
                    }
                })
                .collect();
            let direction = match direction {
                SplitDirection::Row => Direction::Horizontal,
                SplitDirection::Column => Direction::Vertical,
            };
            let chunks = Layout::default()
                .direction(direction)
                .constraints(constraints)
                .split(area);
            for (child, chunk) in children.iter().zip(chunks.iter()) {
                draw_node(buf, *chunk, child, palette);
            }
        }
        LayoutNode::Leaf(ModuleInvocation { content, .. }) => {
            draw_block(buf, area, content, Borders::ALL, palette);
        }
        LayoutNode::Fixed { content, .. } => {
            draw_block(buf, area, content, Borders::TOP | Borders::BOTTOM, palette);
        }
    }
}

fn draw_block(
    buf: &mut Buffer,
    area: Rect,
    content: &ContentBlock,
    borders: Borders,
    palette: &Palette,
) {
    let mut block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(palette.color(content.border)));
    if !content.title.is_empty() {
        block = block.title(Span::styled(
            format!(" {} ", content.title),
            Style::default()
                .fg(palette.color(content.title_tone))
                .add_modifier(Modifier::BOLD),
        ));
    }

    Paragraph::new(content.body.clone())
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.theme.fg))
        .render(area, buf);
}

/// A ratatui terminal showing the dashboard.
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    palette: Palette,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>, palette: Palette) -> Self {
        Self { terminal, palette }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> DisplaySurface for TerminalSurface<B> {
    fn paint(&mut self, screen: &Screen) -> Result<()> {
        let palette = &self.palette;
        self.terminal
            .draw(|frame| render(frame, screen, palette))
            .map_err(|e| anyhow::anyhow!("Failed to draw dashboard: {e}"))?;
        Ok(())
    }
}

/// Off-screen surface for output that is not a terminal.
pub struct BufferSurface {
    buffer: Buffer,
    palette: Palette,
}

impl BufferSurface {
    pub fn new(width: u16, height: u16, palette: Palette) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            palette,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Buffer contents as plain text, trailing spaces trimmed.
    pub fn to_plain(&self) -> String {
        let area = self.buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                let row: String = (area.left()..area.right())
                    .map(|x| self.buffer[(x, y)].symbol())
                    .collect();
                row.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DisplaySurface for BufferSurface {
    fn paint(&mut self, screen: &Screen) -> Result<()> {
        self.buffer.reset();
        let area = self.buffer.area;
        draw_screen(&mut self.buffer, area, screen, &self.palette);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{InvocationStatus, ModuleInvocation};
    use crate::ui::theme::Tone;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;

    fn leaf(title: &str, body: &str) -> Screen {
        LayoutNode::Leaf(ModuleInvocation {
            module: title.to_lowercase(),
            status: InvocationStatus::Rendered,
            content: ContentBlock::new(title, body.to_string()),
        })
    }

    fn palette() -> Palette {
        Palette::new(None, "bright_cyan")
    }

    fn row(children: Vec<Screen>, ratios: Option<Vec<u16>>) -> Screen {
        LayoutNode::Split {
            direction: SplitDirection::Row,
            children,
            ratios,
        }
    }

    #[test]
    fn test_leaf_is_bordered_with_title() {
        let mut surface = BufferSurface::new(20, 5, palette());
        surface.paint(&leaf("FOCUS", "ship it")).expect("paint");
        let text = surface.to_plain();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("┌ FOCUS ─"));
        assert!(lines[0].ends_with('┐'));
        assert!(lines[1].starts_with("│ship it"));
        assert!(lines[1].ends_with('│'));
        assert!(lines[4].starts_with('└'));
    }

    #[test]
    fn test_row_split_honors_ratios() {
        let screen = row(vec![leaf("A", "a"), leaf("B", "b")], Some(vec![1, 3]));
        let mut surface = BufferSurface::new(40, 4, palette());
        surface.paint(&screen).expect("paint");
        let text = surface.to_plain();
        let top = text.lines().next().expect("first line");
        // a quarter of 40 columns for the left panel
        assert_eq!(top.chars().position(|c| c == '┐'), Some(9));
        assert_eq!(top.chars().nth(10), Some('┌'));
    }

    #[test]
    fn test_fixed_band_keeps_height() {
        let header = LayoutNode::Fixed {
            height: 3,
            content: ContentBlock::new("", "HEADER".to_string()),
        };
        let screen = LayoutNode::Split {
            direction: SplitDirection::Column,
            children: vec![header, leaf("BODY", "rest")],
            ratios: None,
        };
        let mut surface = BufferSurface::new(20, 10, palette());
        surface.paint(&screen).expect("paint");
        let text = surface.to_plain();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].chars().all(|c| c == '─'));
        assert_eq!(lines[1], "HEADER");
        assert!(lines[2].chars().all(|c| c == '─'));
        assert!(lines[3].starts_with("┌ BODY"));
        assert!(lines[9].starts_with('└'));
    }

    #[test]
    fn test_border_tone_resolves_through_palette() {
        let block = ContentBlock::new("X", "y".to_string()).with_border(Tone::Color(Color::Red));
        let screen = LayoutNode::Leaf(ModuleInvocation {
            module: "x".to_string(),
            status: InvocationStatus::Rendered,
            content: block,
        });
        let mut surface = BufferSurface::new(10, 3, palette());
        surface.paint(&screen).expect("paint");
        assert_eq!(surface.buffer()[(0, 0)].fg, Color::Red);
    }

    #[test]
    fn test_terminal_surface_draws_on_test_backend() {
        let terminal = Terminal::new(TestBackend::new(30, 6)).expect("terminal");
        let mut surface = TerminalSurface::new(terminal, palette());
        surface
            .paint(&row(vec![leaf("GIT", "main"), leaf("QUEUE", "-")], None))
            .expect("paint");

        let buffer = surface.terminal_mut().backend().buffer().clone();
        let top: String = (0..30).map(|x| buffer[(x, 0)].symbol()).collect();
        assert!(top.contains("GIT"));
        assert!(top.contains("QUEUE"));
    }
}
