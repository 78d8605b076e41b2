//! Static text label

use super::{impl_item_builders, Decoration, DashboardItem, ItemBase};
use crate::ui::surface::Surface;
use crate::ui::theme::Palette;
use labterm_types::{Placement, Value};
use serde::{Deserialize, Serialize};

/// Layout-file form of a [`Label`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(flatten)]
    pub placement: Placement,
    pub text: String,
    #[serde(flatten)]
    pub decoration: Decoration,
}

/// Fixed text with no binding, grid cell or action
#[derive(Debug, Clone)]
pub struct Label {
    base: ItemBase,
}

impl Label {
    pub fn new(placement: Placement, text: impl Into<String>) -> Self {
        Self {
            base: ItemBase::new(placement, Value::String(text.into())),
        }
    }

    pub fn from_config(config: &LabelConfig) -> Self {
        let mut label = Self::new(config.placement, config.text.clone());
        label.base.decoration = config.decoration.clone();
        label
    }

    pub fn text(&self) -> &str {
        self.base.value.as_str().unwrap_or_default()
    }
}

impl_item_builders!(Label);

impl DashboardItem for Label {
    fn base(&self) -> &ItemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ItemBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "label"
    }

    fn draw(&self, surface: &mut Surface<'_>, palette: &Palette, _selected: bool) {
        let text = self.base.decorate(self.text());
        self.base.put(surface, &text, palette.emphasis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::test_support::{render_item, row_text};
    use labterm_types::HAlign;
    use ratatui::style::Modifier;

    #[test]
    fn test_label_draws_bold_text() {
        let label = Label::new(Placement::prop(0.5, 0.5), "Hello");
        let buf = render_item(&label, 20, 4, false);
        assert_eq!(row_text(&buf, 2), "          Hello");
        assert!(buf[(10, 2)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_label_centered_with_decoration() {
        let label = Label::new(Placement::cell(10, 0).align(HAlign::Center), "mid")
            .before("<")
            .after(">");
        let buf = render_item(&label, 20, 1, false);
        assert_eq!(row_text(&buf, 0), "        <mid>");
    }

    #[test]
    fn test_label_from_config() {
        let config: LabelConfig = serde_json::from_str(
            r#"{"x": 2, "y": 1, "coords": "int", "text": "Power", "text_after": ":"}"#,
        )
        .unwrap();
        let label = Label::from_config(&config);
        assert_eq!(label.text(), "Power");
        let buf = render_item(&label, 12, 2, false);
        assert_eq!(row_text(&buf, 1), "  Power:");
        assert!(!label.is_navigable());
        assert_eq!(label.grid(), None);
    }
}
