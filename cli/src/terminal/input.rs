use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use lanwatch_core::views::inventory::Confirm;
use tracing::warn;

use crate::terminal::{colors, print};

/// Single-key `y`/`n` prompt read from the terminal in raw mode.
///
/// Anything but an explicit yes declines, including a terminal that cannot
/// enter raw mode.
pub struct KeyConfirm {
    assume_yes: bool,
}

impl KeyConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for KeyConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print::print(&format!(
            "{} {} {}",
            "?".color(colors::ACCENT).bold(),
            prompt.color(colors::TEXT_DEFAULT),
            "[y/N]".color(colors::SEPARATOR)
        ));

        let _raw = match RawMode::enable() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Cannot read a key from this terminal ({e}), pass --yes to confirm");
                return false;
            }
        };

        answer(event::read)
    }
}

/// Reads keys until one decides the prompt. The blocking read is moved off
/// the async worker.
fn answer(mut read: impl FnMut() -> std::io::Result<Event>) -> bool {
    loop {
        let key = match tokio::task::block_in_place(&mut read) {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(_) => return false,
        };
        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            _ if ctrl_c => return false,
            KeyCode::Char('y') | KeyCode::Char('Y') => return true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter | KeyCode::Esc => return false,
            _ => {}
        }
    }
}

struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        enable_raw_mode()?;
        Ok(RawMode)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
