//! Terminal display and UI rendering
//!
//! Features:
//! - Full-screen text pages, centered, on a dark or grey backdrop
//! - End-of-session accuracy summary

use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use crate::session::{AccuracyTracker, Backdrop, OutcomeCounts};

/// Terminal display manager
pub struct Display {
    /// Whether we're using alternate screen
    use_alternate_screen: bool,
}

impl Display {
    /// Take over the terminal with an alternate screen and hidden cursor
    pub fn fullscreen() -> std::io::Result<Self> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(Display {
            use_alternate_screen: true,
        })
    }

    fn backdrop_color(backdrop: Backdrop) -> Color {
        match backdrop {
            Backdrop::Dark => Color::Rgb { r: 5, g: 5, b: 5 },
            Backdrop::Grey => Color::Rgb {
                r: 128,
                g: 128,
                b: 128,
            },
        }
    }

    /// Break `text` into lines no wider than `width`, splitting at spaces.
    /// Lines that already fit are kept as-is (pair padding included); words
    /// longer than `width` are cut.
    pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
        let width = width.max(1);
        let mut wrapped = Vec::new();

        for line in text.lines() {
            if line.chars().count() <= width {
                wrapped.push(line.to_string());
                continue;
            }

            let mut current = String::new();
            let mut current_len = 0;

            for word in line.split_whitespace() {
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(width) {
                    let piece_len = piece.len();
                    if current_len > 0 && current_len + 1 + piece_len > width {
                        wrapped.push(std::mem::take(&mut current));
                        current_len = 0;
                    }
                    if current_len > 0 {
                        current.push(' ');
                        current_len += 1;
                    }
                    current.extend(piece);
                    current_len += piece_len;
                }
            }
            wrapped.push(current);
        }

        wrapped
    }

    /// Clear to `backdrop` and draw `text` wrapped and centered, line by line
    pub fn show_page(&self, backdrop: Backdrop, text: &str) -> std::io::Result<()> {
        let mut stdout = stdout();
        let (cols, rows) = terminal::size()?;

        queue!(
            stdout,
            SetBackgroundColor(Self::backdrop_color(backdrop)),
            terminal::Clear(ClearType::All),
            SetForegroundColor(Color::White),
        )?;

        let lines = Self::wrap_text(text, cols as usize);
        let top = rows.saturating_sub(lines.len() as u16) / 2;
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count() as u16;
            let left = cols.saturating_sub(width) / 2;
            queue!(stdout, cursor::MoveTo(left, top + i as u16), Print(line))?;
        }

        queue!(stdout, ResetColor)?;
        stdout.flush()
    }

    /// Print the per-block accuracy table (after the terminal is restored)
    pub fn show_summary(tracker: &AccuracyTracker) -> std::io::Result<()> {
        let mut stdout = stdout();

        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("─".repeat(80)),
            Print("\n"),
            ResetColor,
            Print(format!(
                "{:<8} {:>6} {:>5} {:>5} {:>5} {:>5} {:>7} {:>7} {:>8} {:>9}\n",
                "block", "trials", "hit", "miss", "fa", "cr", "hit %", "fa %", "accuracy", "mean rt"
            )),
        )?;

        for (stage, counts) in tracker.blocks() {
            Self::summary_row(&mut stdout, stage.label(), counts)?;
        }
        Self::summary_row(&mut stdout, "all", &tracker.overall())?;

        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("─".repeat(80)),
            Print("\n"),
            ResetColor
        )?;
        stdout.flush()
    }

    fn summary_row(
        stdout: &mut impl Write,
        label: &str,
        counts: &OutcomeCounts,
    ) -> std::io::Result<()> {
        let accuracy = counts.accuracy();
        execute!(
            stdout,
            Print(format!(
                "{:<8} {:>6} {:>5} {:>5} {:>5} {:>5} {:>6.1}% {:>6.1}% ",
                label,
                counts.trials(),
                counts.hits,
                counts.misses,
                counts.false_alarms,
                counts.correct_rejections,
                counts.hit_rate() * 100.0,
                counts.false_alarm_rate() * 100.0,
            )),
            SetForegroundColor(if accuracy > 0.9 {
                Color::Green
            } else if accuracy > 0.7 {
                Color::Yellow
            } else {
                Color::Red
            }),
            Print(format!("{:>7.1}%", accuracy * 100.0)),
            ResetColor,
            Print(format!(" {:>8.3}s\n", counts.mean_response_time())),
        )
    }

    /// Reset terminal state and cleanup
    pub fn shutdown(&mut self) -> std::io::Result<()> {
        let mut stdout = stdout();

        if self.use_alternate_screen {
            execute!(stdout, ResetColor, LeaveAlternateScreen, cursor::Show)?;
            self.use_alternate_screen = false;
        }

        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        // Best effort cleanup
        let _ = self.shutdown();
    }
}
