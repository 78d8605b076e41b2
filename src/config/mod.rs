//! Configuration management

mod layout;
mod settings;

pub use layout::{ItemConfig, LayoutConfig, LayoutError};
pub use settings::{default_controls_text, DashboardConfig};
