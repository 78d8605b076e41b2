//! Two-state switch bound to an instrument action

use super::{impl_item_builders, Decoration, DashboardItem, ItemBase};
use crate::ui::surface::Surface;
use crate::ui::theme::{highlight, Palette};
use labterm_types::{is_truthy, ChannelId, GridPos, Placement, Value};
use serde::{Deserialize, Serialize};

fn default_on_text() -> String {
    "ON".to_string()
}

fn default_off_text() -> String {
    "OFF".to_string()
}

/// Layout-file form of a [`Switch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchConfig {
    #[serde(flatten)]
    pub placement: Placement,
    pub grid: GridPos,
    pub channel: ChannelId,
    pub field: String,
    pub action: String,
    #[serde(default)]
    pub initial_value: bool,
    #[serde(default = "default_on_text")]
    pub on_text: String,
    #[serde(default = "default_off_text")]
    pub off_text: String,
    #[serde(flatten)]
    pub decoration: Decoration,
}

/// Navigable on/off item
///
/// Enter fires the bound action with no argument; the displayed state only
/// changes when the instrument reports it.
#[derive(Debug, Clone)]
pub struct Switch {
    base: ItemBase,
    on_text: String,
    off_text: String,
}

impl Switch {
    pub fn new(
        placement: Placement,
        grid: GridPos,
        channel: ChannelId,
        field: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        let mut base = ItemBase::new(placement, Value::Bool(false));
        base.grid = Some(grid);
        base.channel = Some(channel);
        base.field = Some(field.into());
        base.action = Some(action.into());
        Self {
            base,
            on_text: default_on_text(),
            off_text: default_off_text(),
        }
    }

    pub fn from_config(config: &SwitchConfig) -> Self {
        let mut switch = Self::new(
            config.placement,
            config.grid,
            config.channel,
            config.field.clone(),
            config.action.clone(),
        )
        .labels(config.on_text.clone(), config.off_text.clone())
        .initial(config.initial_value);
        switch.base.decoration = config.decoration.clone();
        switch
    }

    /// Text shown inside the brackets for each state
    pub fn labels(mut self, on: impl Into<String>, off: impl Into<String>) -> Self {
        self.on_text = on.into();
        self.off_text = off.into();
        self
    }

    pub fn initial(mut self, on: bool) -> Self {
        self.base.value = Value::Bool(on);
        self
    }

    pub fn is_on(&self) -> bool {
        is_truthy(&self.base.value)
    }

    fn state_text(&self) -> String {
        let label = if self.is_on() {
            &self.on_text
        } else {
            &self.off_text
        };
        format!("[{}]", label)
    }
}

impl_item_builders!(Switch);

impl DashboardItem for Switch {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "switch"
    }

    fn is_navigable(&self) -> bool {
        true
    }

    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, selected: bool) {
        let text = self.base.decorate(&self.state_text());
        let style = highlight(palette.state(self.is_on()), selected);
        self.base.put(surface, &text, style);
    }
}
