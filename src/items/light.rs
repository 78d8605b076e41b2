//! Indicator light

use super::{impl_item_builders, Decoration, DashboardItem, ItemBase};
use crate::ui::surface::Surface;
use crate::ui::theme::Palette;
use labterm_types::{is_truthy, ChannelId, Placement, Value};
use serde::{Deserialize, Serialize};

const LIGHT_GLYPH: &str = "\u{25CF}";
const UNKNOWN_GLYPH: &str = "-";

fn default_light_value() -> Option<Value> {
    Some(Value::Bool(false))
}

/// Layout-file form of a [`Light`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(flatten)]
    pub placement: Placement,
    pub channel: ChannelId,
    pub field: String,
    #[serde(default = "default_light_value")]
    pub initial_value: Option<Value>,
    #[serde(flatten)]
    pub decoration: Decoration,
}

/// Green when the bound field is truthy, red otherwise
#[derive(Debug, Clone)]
pub struct Light {
    base: ItemBase,
}

impl Light {
    pub fn new(placement: Placement, channel: ChannelId, field: impl Into<String>) -> Self {
        let mut base = ItemBase::new(placement, Value::Bool(false));
        base.channel = Some(channel);
        base.field = Some(field.into());
        Self { base }
    }

    pub fn from_config(config: &LightConfig) -> Self {
        let mut light = Self::new(config.placement, config.channel, config.field.clone());
        light.base.value = config.initial_value.clone().unwrap_or(Value::Null);
        light.base.decoration = config.decoration.clone();
        light
    }
}

impl_item_builders!(Light);

impl DashboardItem for Light {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "light"
    }

    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, _selected: bool) {
        let glyph = if self.base.value.is_null() {
            UNKNOWN_GLYPH
        } else {
            LIGHT_GLYPH
        };
        let text = self.base.decorate(glyph);
        self.base
            .put(surface, &text, palette.state(is_truthy(&self.base.value)));
    }
}
