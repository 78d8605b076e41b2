//! labterm-types: Shared data types for the labterm terminal dashboard.
//!
//! This crate contains pure data types (placement, grid coordinates, key
//! model, field metadata, value formatting) that are shared across all
//! labterm crates. Nothing here depends on a terminal backend.

pub mod field;
pub mod grid;
pub mod key;
pub mod placement;
pub mod value;

/// Integer key linking dashboard items to the instrument that feeds them.
pub type ChannelId = u16;

// Re-export commonly used types at the crate root for convenience
pub use field::{FieldMetadata, FieldType};
pub use grid::{Direction, GridBounds, GridPos};
pub use key::Key;
pub use placement::{CoordSystem, HAlign, Placement};
pub use value::{format_value, is_truthy, Value};
