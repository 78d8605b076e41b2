//! Dashboard items
//!
//! Items are the drawable elements of a dashboard. Each one renders a cached
//! value at a declared placement, and may be bound to an instrument field
//! (the poller feeds it new values), to an instrument action (triggered with
//! Enter), and to a grid cell (it becomes navigable).

mod editable;
mod label;
mod light;
mod readonly;
mod switch;

pub use editable::{Editable, EditableConfig, ParseFailure};
pub use label::{Label, LabelConfig};
pub use light::{Light, LightConfig};
pub use readonly::{Readonly, ReadonlyConfig};
pub use switch::{Switch, SwitchConfig};

use crate::ui::surface::{text_width, Surface};
use crate::ui::theme::Palette;
use labterm_types::{ChannelId, GridPos, Key, Placement, Value};
use ratatui::style::Style;
use serde::{Deserialize, Serialize};

/// Result of feeding a key to an item in edit mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    /// Keep editing
    Continue,
    /// Leave edit mode without invoking anything
    Cancel,
    /// Leave edit mode and invoke the item's action with this value
    Commit(f64),
}

/// Text wrapped around an item's main content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    #[serde(default)]
    pub text_before: String,
    #[serde(default)]
    pub text_after: String,
}

/// State every item carries
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBase {
    pub placement: Placement,
    /// Cell on the navigable grid, for navigable items
    pub grid: Option<GridPos>,
    pub channel: Option<ChannelId>,
    /// Instrument field this item mirrors
    pub field: Option<String>,
    /// Instrument action triggered by this item
    pub action: Option<String>,
    pub decoration: Decoration,
    /// Fractional digits for numeric values
    pub decimals: usize,
    /// Last known value
    pub value: Value,
}

impl ItemBase {
    pub fn new(placement: Placement, value: Value) -> Self {
        Self {
            placement,
            grid: None,
            channel: None,
            field: None,
            action: None,
            decoration: Decoration::default(),
            decimals: 2,
            value,
        }
    }

    /// `text_before + body + text_after`
    pub fn decorate(&self, body: &str) -> String {
        format!(
            "{}{}{}",
            self.decoration.text_before, body, self.decoration.text_after
        )
    }

    /// Resolve the placement for `text` and write it
    pub fn put(&self, surface: &mut Surface<'_>, text: &str, style: Style) {
        let (col, row) =
            self.placement
                .resolve(surface.width(), surface.height(), text_width(text));
        surface.put(col, row, text, style);
    }
}

/// Trait for all dashboard items
///
/// Only [`draw`](DashboardItem::draw) is required; the edit hooks have
/// no-op defaults for items that are not editable.
pub trait DashboardItem {
    fn base(&self) -> &ItemBase;

    fn base_mut(&mut self) -> &mut ItemBase;

    /// Short type name, used in logs
    fn kind(&self) -> &'static str;

    /// Render the item
    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, selected: bool);

    /// Whether the cursor can land on this item
    fn is_navigable(&self) -> bool {
        false
    }

    /// Whether Enter puts this item into edit mode instead of firing its action
    fn is_editable(&self) -> bool {
        false
    }

    /// Called when the item enters edit mode
    fn enter_edit(&mut self) {}

    /// Called when the item leaves edit mode, whatever the outcome
    fn exit_edit(&mut self) {}

    /// Handle a key while in edit mode
    fn handle_edit_key(&mut self, _key: Key) -> EditOutcome {
        EditOutcome::Cancel
    }

    /// Grid cell, if navigable
    fn grid(&self) -> Option<GridPos> {
        if self.is_navigable() {
            self.base().grid
        } else {
            None
        }
    }

    fn value(&self) -> &Value {
        &self.base().value
    }

    fn set_value(&mut self, value: Value) {
        self.base_mut().value = value;
    }
}

/// Type-erased item for dynamic dispatch
pub type BoxedItem = Box<dyn DashboardItem>;

/// Builder methods shared by every item type
macro_rules! impl_item_builders {
    ($type:ty) => {
        impl $type {
            /// Text drawn before the main content
            pub fn before(mut self, text: impl Into<String>) -> Self {
                self.base.decoration.text_before = text.into();
                self
            }

            /// Text drawn after the main content
            pub fn after(mut self, text: impl Into<String>) -> Self {
                self.base.decoration.text_after = text.into();
                self
            }

            /// Fractional digits for numeric values
            pub fn decimals(mut self, decimals: usize) -> Self {
                self.base.decimals = decimals;
                self
            }

            pub fn placement(mut self, placement: labterm_types::Placement) -> Self {
                self.base.placement = placement;
                self
            }
        }
    };
}

pub(crate) use impl_item_builders;
