//! Colour palette for the dashboard
//!
//! Five roles cover everything the dashboard draws. The palette is a plain
//! value picked by the renderer from the inversion flag; nothing global is
//! mutated when the user toggles colours.

use ratatui::style::{Color, Modifier, Style};

/// Style for each kind of text the dashboard draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub default: Style,
    pub selected: Style,
    pub on: Style,
    pub off: Style,
    pub editable: Style,
}

impl Palette {
    /// Light text on a dark background
    pub fn normal() -> Self {
        Self::with_background(Color::White, Color::Black)
    }

    /// Dark text on a light background
    pub fn inverted() -> Self {
        Self::with_background(Color::Black, Color::White)
    }

    pub fn for_inverted(inverted: bool) -> Self {
        if inverted {
            Self::inverted()
        } else {
            Self::normal()
        }
    }

    fn with_background(fg: Color, bg: Color) -> Self {
        Self {
            default: Style::default().fg(fg).bg(bg),
            selected: Style::default().fg(bg).bg(fg),
            on: Style::default().fg(Color::Green).bg(bg),
            off: Style::default().fg(Color::Red).bg(bg),
            editable: Style::default().fg(Color::Yellow).bg(bg),
        }
    }

    /// On/off style for a boolean state
    pub fn state(&self, on: bool) -> Style {
        if on {
            self.on
        } else {
            self.off
        }
    }

    /// Bold variant of the default style, for labels and titles
    pub fn emphasis(&self) -> Style {
        self.default.add_modifier(Modifier::BOLD)
    }
}

/// Reverse video when `selected`
pub fn highlight(style: Style, selected: bool) -> Style {
    if selected {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}
