//! # Header Band
//!
//! The top band is a pure function of the profile, the animation frame and
//! the wall-clock time. It never touches modules, so it can be redrawn on
//! every fast tick.
//!
//! ```text
//! ──────────────────────────────────────────────────────────────────────
//!  ◈ MIRRORDASH  ─  Deep Work  ─  one task, no noise  ▂▃▅▇▅▃▂▁  14:03:27
//! ──────────────────────────────────────────────────────────────────────
//! ```

use super::layout::LayoutNode;
use crate::modules::ContentBlock;
use crate::profile::Profile;
use crate::ui::theme::{parse_color, Tone};
use chrono::NaiveTime;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Height of the header band, borders included.
pub const HEADER_HEIGHT: u16 = 3;

/// Pulse glyph cycle.
pub const PULSE: [&str; 4] = ["◇", "◈", "◆", "◈"];

/// Decorative trace scrolled one cell per frame.
pub const TRACE: &str = "▁▁▂▃▅▇█▇▅▃▂▁▁▁▁▂▁▁▃▆▃▁▁▁";

/// Number of characters in [`TRACE`].
pub const TRACE_LEN: usize = 24;

/// Visible width of the scrolling trace.
pub const TRACE_WINDOW: usize = 16;

/// Animation frame counter.
///
/// Advanced once per fast tick and wrapped at [`FrameState::CYCLE`], a
/// multiple of every animation length. The cycle is even, so blink parity
/// survives the wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameState(u64);

impl FrameState {
    pub const CYCLE: u64 = (PULSE.len() * TRACE_LEN) as u64;

    pub fn new(value: u64) -> Self {
        Self(value % Self::CYCLE)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn advance(&mut self) {
        self.0 = (self.0 + 1) % Self::CYCLE;
    }

    /// `true` on even frames.
    pub fn blink_on(self) -> bool {
        self.0 % 2 == 0
    }
}

/// Pulse glyph for the frame.
pub fn pulse_glyph(frame: FrameState) -> &'static str {
    PULSE[(frame.value() % PULSE.len() as u64) as usize]
}

/// [`TRACE_WINDOW`] characters of the trace starting at `frame mod TRACE_LEN`,
/// wrapping past the end.
pub fn trace_window(frame: FrameState) -> String {
    let offset = (frame.value() % TRACE_LEN as u64) as usize;
    TRACE
        .chars()
        .chain(TRACE.chars())
        .skip(offset)
        .take(TRACE_WINDOW)
        .collect()
}

/// Header content for one tick.
pub fn header_block(profile: &Profile, frame: FrameState, now: NaiveTime) -> ContentBlock {
    let accent = parse_color(&profile.color).unwrap_or(Color::LightCyan);
    let strong = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let separator = Style::default().fg(Color::DarkGray);

    let line = Line::from(vec![
        Span::styled(format!("{} ", pulse_glyph(frame)), strong),
        Span::styled("MIRRORDASH", strong),
        Span::styled("  ─  ", separator),
        Span::styled(profile.name.clone(), Style::default().fg(Color::White)),
        Span::styled("  ─  ", separator),
        Span::styled(profile.description.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(trace_window(frame), Style::default().fg(accent)),
        Span::styled(
            format!("  {}", now.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    ContentBlock {
        title: String::new(),
        title_tone: Tone::Accent,
        border: Tone::Accent,
        blink: None,
        body: Text::from(line),
    }
}

/// Header as the fixed-height node at the top of the screen tree.
pub fn header_node<L>(profile: &Profile, frame: FrameState, now: NaiveTime) -> LayoutNode<L> {
    LayoutNode::Fixed {
        height: HEADER_HEIGHT,
        content: header_block(profile, frame, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 34, 56).expect("valid time")
    }

    #[test]
    fn test_trace_len_matches_trace() {
        assert_eq!(TRACE.chars().count(), TRACE_LEN);
        assert!(TRACE_WINDOW < TRACE_LEN);
    }

    #[test]
    fn test_frame_wraps_at_cycle() {
        let mut frame = FrameState::new(FrameState::CYCLE - 1);
        assert!(!frame.blink_on());
        frame.advance();
        assert_eq!(frame.value(), 0);
        assert!(frame.blink_on());
        assert_eq!(FrameState::new(FrameState::CYCLE + 3).value(), 3);
    }

    #[test]
    fn test_pulse_cycles() {
        let glyphs: Vec<&str> = (0..5).map(|i| pulse_glyph(FrameState::new(i))).collect();
        assert_eq!(glyphs, vec!["◇", "◈", "◆", "◈", "◇"]);
    }

    #[test]
    fn test_trace_scrolls_and_wraps() {
        let first = trace_window(FrameState::new(0));
        let second = trace_window(FrameState::new(1));
        assert_eq!(first.chars().count(), TRACE_WINDOW);
        assert_eq!(
            first.chars().skip(1).collect::<String>(),
            second.chars().take(TRACE_WINDOW - 1).collect::<String>()
        );

        let wrapped = trace_window(FrameState::new(TRACE_LEN as u64 - 2));
        assert_eq!(wrapped.chars().count(), TRACE_WINDOW);
        let expected: String = TRACE
            .chars()
            .skip(TRACE_LEN - 2)
            .chain(TRACE.chars().take(TRACE_WINDOW - 2))
            .collect();
        assert_eq!(wrapped, expected);
        assert_eq!(trace_window(FrameState::new(TRACE_LEN as u64)), first);
    }

    #[test]
    fn test_header_contains_profile_and_time() {
        let profile = Profile {
            name: "Deep Work".to_string(),
            description: "one task".to_string(),
            ..Profile::default()
        };
        let block = header_block(&profile, FrameState::new(2), noon());
        let text = block.plain_body();
        assert!(text.starts_with("◆ MIRRORDASH"));
        assert!(text.contains("Deep Work"));
        assert!(text.contains("one task"));
        assert!(text.ends_with("12:34:56"));
        assert_eq!(block.border, Tone::Accent);
    }

    #[test]
    fn test_header_is_pure() {
        let profile = Profile::default();
        let frame = FrameState::new(17);
        assert_eq!(
            header_block(&profile, frame, noon()),
            header_block(&profile, frame, noon())
        );
    }

    #[test]
    fn test_header_node_is_fixed_height() {
        let node: LayoutNode<()> = header_node(&Profile::default(), FrameState::default(), noon());
        assert!(matches!(
            node,
            LayoutNode::Fixed {
                height: HEADER_HEIGHT,
                ..
            }
        ));
    }
}
