//! labterm: A small terminal dashboard toolkit for lab-control and
//! status-monitoring programs
//!
//! This library provides:
//! - Dashboard items (labels, switches, read-only values, editable values, lights)
//! - The [`Dashboard`] render loop with keyboard navigation and editing
//! - Layout files describing a dashboard as JSON
//! - A static instrument for previewing layouts
//!
//! Instruments implement [`Instrument`] from `labterm-core` and are polled
//! in the background.

pub mod config;
pub mod dashboard;
pub mod instruments;
pub mod items;
pub mod ui;

// Re-export commonly used types
pub use config::{DashboardConfig, ItemConfig, LayoutConfig, LayoutError};
pub use dashboard::{Dashboard, Mode};
pub use items::{
    BoxedItem, DashboardItem, Editable, EditOutcome, Label, Light, ParseFailure, Readonly, Switch,
};
pub use labterm_core::{Instrument, Logger};
pub use labterm_types::{ChannelId, GridPos, HAlign, Key, Placement, Value};
