//! Editable numeric value
//!
//! Shows the latest value of an instrument field like [`Readonly`], but can
//! be selected and edited. While editing, digits, `-` and `.` accumulate in
//! a buffer drawn as `>buffer_`. Enter parses the buffer and commits it to
//! the bound action; Esc cancels.
//!
//! [`Readonly`]: super::Readonly

use super::{impl_item_builders, Decoration, DashboardItem, EditOutcome, ItemBase};
use crate::ui::surface::Surface;
use crate::ui::theme::{highlight, Palette};
use labterm_types::{format_value, ChannelId, GridPos, Key, Placement, Value};
use serde::{Deserialize, Serialize};

/// What Enter does when the buffer is not a number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailure {
    /// Invoke the action with this value anyway
    Commit(f64),
    /// Leave edit mode without invoking the action
    Cancel,
}

impl Default for ParseFailure {
    fn default() -> Self {
        ParseFailure::Commit(0.0)
    }
}

fn default_decimals() -> usize {
    2
}

/// Layout-file form of an [`Editable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableConfig {
    #[serde(flatten)]
    pub placement: Placement,
    pub grid: GridPos,
    pub channel: ChannelId,
    pub field: String,
    pub action: String,
    #[serde(default)]
    pub initial_value: f64,
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    #[serde(default)]
    pub on_parse_error: ParseFailure,
    #[serde(flatten)]
    pub decoration: Decoration,
}

/// Navigable, editable numeric item
#[derive(Debug, Clone)]
pub struct Editable {
    base: ItemBase,
    buffer: String,
    editing: bool,
    on_parse_error: ParseFailure,
}

impl Editable {
    pub fn new(
        placement: Placement,
        grid: GridPos,
        channel: ChannelId,
        field: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        let mut base = ItemBase::new(placement, Value::from(0.0));
        base.grid = Some(grid);
        base.channel = Some(channel);
        base.field = Some(field.into());
        base.action = Some(action.into());
        Self {
            base,
            buffer: String::new(),
            editing: false,
            on_parse_error: ParseFailure::default(),
        }
    }

    pub fn from_config(config: &EditableConfig) -> Self {
        let mut editable = Self::new(
            config.placement,
            config.grid,
            config.channel,
            config.field.clone(),
            config.action.clone(),
        )
        .initial(config.initial_value)
        .decimals(config.decimals)
        .on_parse_error(config.on_parse_error);
        editable.base.decoration = config.decoration.clone();
        editable
    }

    pub fn initial(mut self, value: f64) -> Self {
        self.base.value = Value::from(value);
        self
    }

    pub fn on_parse_error(mut self, policy: ParseFailure) -> Self {
        self.on_parse_error = policy;
        self
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

impl_item_builders!(Editable);

impl DashboardItem for Editable {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "editable"
    }

    fn is_navigable(&self) -> bool {
        true
    }

    fn is_editable(&self) -> bool {
        true
    }

    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, selected: bool) {
        let shown = self
            .base
            .decorate(&format_value(&self.base.value, self.base.decimals));
        // Anchor on the committed value so the field does not jump while typing
        let (col, row) =
            self.base
                .placement
                .resolve(surface.width(), surface.height(), shown.chars().count());

        if self.editing {
            let text = format!(">{}_", self.buffer);
            surface.put(col, row, &text, highlight(palette.editable, selected));
        } else {
            let style = if selected {
                palette.selected
            } else {
                palette.default
            };
            surface.put(col, row, &shown, style);
        }
    }

    fn enter_edit(&mut self) {
        self.editing = true;
        self.buffer.clear();
    }

    fn exit_edit(&mut self) {
        self.editing = false;
    }

    fn handle_edit_key(&mut self, key: Key) -> EditOutcome {
        match key {
            Key::Esc => EditOutcome::Cancel,
            Key::Enter => match self.buffer.trim().parse::<f64>() {
                Ok(value) => {
                    self.base.value = Value::from(value);
                    EditOutcome::Commit(value)
                }
                Err(_) => {
                    log::debug!("Edit buffer '{}' is not a number", self.buffer);
                    self.buffer.clear();
                    match self.on_parse_error {
                        ParseFailure::Commit(fallback) => EditOutcome::Commit(fallback),
                        ParseFailure::Cancel => EditOutcome::Cancel,
                    }
                }
            },
            Key::Backspace => {
                self.buffer.pop();
                EditOutcome::Continue
            }
            other => {
                if let Some(c) = other.numeric_char() {
                    self.buffer.push(c);
                }
                EditOutcome::Continue
            }
        }
    }
}
