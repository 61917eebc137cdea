//! Keyboard input.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Trait for reading terminal events (allows dependency injection for testing)
pub trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
pub struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// `q`, `Esc` or `Ctrl+C`.
pub fn is_quit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
