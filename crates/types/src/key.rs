//! Backend-independent key model

use crate::grid::Direction;

/// A single key press as seen by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    /// Ctrl+C
    Interrupt,
    Char(char),
}

impl Key {
    /// Arrow keys map to a grid direction
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Characters accepted into a numeric edit buffer
    pub fn numeric_char(self) -> Option<char> {
        match self {
            Key::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => Some(c),
            _ => None,
        }
    }
}
