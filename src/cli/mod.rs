//! CLI Interface: User input and terminal rendering
//!
//! # Components
//! - `input.rs`: Keystroke capture using crossterm
//! - `display.rs`: Terminal rendering and UI
//!
//! [`Terminal`] joins the two into the session's [`Presenter`].

pub mod display;
pub mod input;

use std::thread;
use std::time::Duration;

use crate::session::{Backdrop, Key, Presenter, Result};
use display::Display;
use input::InputHandler;

/// Raw-mode terminal running the task
pub struct Terminal {
    display: Display,
    input: InputHandler,
}

impl Terminal {
    /// Switch the terminal to raw mode on an alternate screen
    pub fn open() -> Result<Self> {
        InputHandler::enable_raw_mode()?;
        let display = match Display::fullscreen() {
            Ok(display) => display,
            Err(e) => {
                let _ = InputHandler::disable_raw_mode();
                return Err(e.into());
            }
        };
        Ok(Terminal {
            display,
            input: InputHandler::new(),
        })
    }

    /// Give the terminal back in its normal state
    pub fn close(mut self) -> Result<()> {
        self.display.shutdown()?;
        Ok(())
    }
}

impl Presenter for Terminal {
    fn show(&mut self, backdrop: Backdrop, text: &str) -> Result<()> {
        self.display.show_page(backdrop, text)?;
        Ok(())
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        thread::sleep(duration);
        Ok(())
    }

    fn wait_for_key(&mut self, accepted: &[Key]) -> Result<Key> {
        self.input.wait_for_key(accepted)
    }
}
