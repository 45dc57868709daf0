//! Keystroke input handling using crossterm
//!
//! Features:
//! - Blocking wait for one of a set of keys
//! - Keys typed ahead of the wait are discarded
//! - Escape / Ctrl+C abort

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result as IoResult;
use std::time::Duration;

use crate::session::{ExperimentError, Key, Result};

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for each poll while waiting
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler with default timeout (50ms for responsive input)
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::from_millis(50),
        }
    }

    /// Enable raw mode for terminal input
    pub fn enable_raw_mode() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()
    }

    /// Disable raw mode and restore terminal
    pub fn disable_raw_mode() -> IoResult<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// Drop every event already queued
    fn discard_pending(&self) -> IoResult<()> {
        while event::poll(Duration::ZERO)? {
            event::read()?;
        }
        Ok(())
    }

    /// Block until one of `accepted` is pressed
    pub fn wait_for_key(&self, accepted: &[Key]) -> Result<Key> {
        self.discard_pending()?;

        loop {
            if !event::poll(self.poll_timeout)? {
                continue;
            }
            let Event::Key(key_event) = event::read()? else {
                continue;
            };
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            if Self::is_exit(&key_event) {
                return Err(ExperimentError::Aborted);
            }
            match Self::map_key(&key_event) {
                Some(key) if accepted.contains(&key) => return Ok(key),
                _ => {}
            }
        }
    }

    /// Check if key event is an exit signal (Ctrl+C or Escape)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Esc => true,
            _ => false,
        }
    }

    /// Translate a terminal key into a task key
    pub fn map_key(key: &KeyEvent) -> Option<Key> {
        match key.code {
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
