//! Terminal user interface
//!
//! Drawing goes through a [`surface::Surface`] over a ratatui buffer, so the
//! same code renders to a real terminal and to a test backend.

pub mod events;
pub mod render;
pub mod surface;
pub mod terminal;
pub mod theme;

pub use events::{poll_key, translate_key};
pub use render::{draw, render_dashboard};
pub use surface::Surface;
pub use terminal::{install_panic_hook, restore_terminal, setup_terminal};
pub use theme::Palette;
