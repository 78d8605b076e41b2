//! Read-only value display

use super::{impl_item_builders, Decoration, DashboardItem, ItemBase};
use crate::ui::surface::Surface;
use crate::ui::theme::Palette;
use labterm_types::{format_value, ChannelId, Placement, Value};
use serde::{Deserialize, Serialize};

fn default_decimals() -> usize {
    2
}

fn default_readonly_value() -> Option<Value> {
    Some(Value::from(0.0))
}

/// Layout-file form of a [`Readonly`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadonlyConfig {
    #[serde(flatten)]
    pub placement: Placement,
    pub channel: ChannelId,
    pub field: String,
    /// `null` starts the item out as unknown
    #[serde(default = "default_readonly_value")]
    pub initial_value: Option<Value>,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(flatten)]
    pub decoration: Decoration,
}

/// Shows the latest value of one instrument field
#[derive(Debug, Clone)]
pub struct Readonly {
    base: ItemBase,
}

impl Readonly {
    pub fn new(placement: Placement, channel: ChannelId, field: impl Into<String>) -> Self {
        let mut base = ItemBase::new(placement, Value::from(0.0));
        base.channel = Some(channel);
        base.field = Some(field.into());
        Self { base }
    }

    pub fn from_config(config: &ReadonlyConfig) -> Self {
        let mut readonly = Self::new(config.placement, config.channel, config.field.clone())
            .decimals(config.decimals);
        readonly.base.value = config.initial_value.clone().unwrap_or(Value::Null);
        readonly.base.decoration = config.decoration.clone();
        readonly
    }
}

impl_item_builders!(Readonly);

impl DashboardItem for Readonly {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "readonly"
    }

    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, _selected: bool) {
        let text = self
            .base
            .decorate(&format_value(&self.base.value, self.base.decimals));
        self.base.put(surface, &text, palette.default);
    }
}
