//! Keyboard input from crossterm
//!
//! Polls the terminal for a single key event and translates it into the
//! backend-independent [`Key`]. Polling errors are treated as "no input".

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use labterm_types::Key;
use std::time::Duration;

/// Wait up to `timeout` for one key press
///
/// Returns `None` when no key arrives in time, on non-key events and on any
/// crossterm error.
pub fn poll_key(timeout: Duration) -> Option<Key> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::debug!("Input poll failed: {}", e);
            return None;
        }
    }

    match event::read() {
        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => translate_key(key),
        Ok(_) => None,
        Err(e) => {
            log::debug!("Input read failed: {}", e);
            None
        }
    }
}

/// Map a crossterm key event to a [`Key`]
pub fn translate_key(key: KeyEvent) -> Option<Key> {
    // Ctrl+C always interrupts
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Key::Interrupt);
    }

    match key.code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
