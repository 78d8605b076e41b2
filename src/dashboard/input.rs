//! Key routing

use super::Dashboard;
use crate::items::EditOutcome;
use labterm_core::{ItemId, RegistryError};
use labterm_types::{Direction, Key};
use log::debug;

/// What keys currently act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Arrows move the cursor, Enter activates the selected item
    Navigating,
    /// Keys go to the item being edited
    Editing(ItemId),
}

impl Dashboard {
    /// Route one key press; returns `false` once the dashboard should quit
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Interrupt | Key::Char('q') => {
                self.quit();
                return false;
            }
            Key::Char('i') => {
                self.inverted = !self.inverted;
                return true;
            }
            _ => {}
        }

        match self.mode {
            Mode::Navigating => self.handle_navigation_key(key),
            Mode::Editing(id) => self.handle_edit_key(id, key),
        }
        true
    }

    /// Leave the render loop after the current frame
    pub fn quit(&mut self) {
        if let Mode::Editing(id) = self.mode {
            if let Some(item) = self.items.get_mut(id) {
                item.exit_edit();
            }
            self.mode = Mode::Navigating;
        }
        self.running = false;
    }

    fn handle_navigation_key(&mut self, key: Key) {
        if let Some(direction) = key.direction() {
            self.move_cursor(direction);
        } else if key == Key::Enter {
            self.activate_selected();
        }
    }

    fn move_cursor(&mut self, direction: Direction) {
        let Some(bounds) = self.grid_bounds() else {
            return;
        };
        self.cursor = self.cursor.step(direction, bounds, self.config.cycle);
    }

    fn activate_selected(&mut self) {
        let Some(id) = self.selected_item() else {
            debug!(
                "Nothing at grid cell ({}, {})",
                self.cursor.x, self.cursor.y
            );
            return;
        };

        if self.items[id].is_editable() {
            self.items[id].enter_edit();
            self.mode = Mode::Editing(id);
        } else {
            self.trigger_action(id, None);
        }
    }

    fn handle_edit_key(&mut self, id: ItemId, key: Key) {
        let Some(item) = self.items.get_mut(id) else {
            self.mode = Mode::Navigating;
            return;
        };

        match item.handle_edit_key(key) {
            EditOutcome::Continue => {}
            EditOutcome::Cancel => {
                item.exit_edit();
                self.mode = Mode::Navigating;
            }
            EditOutcome::Commit(value) => {
                item.exit_edit();
                self.mode = Mode::Navigating;
                self.trigger_action(id, Some(value));
            }
        }
    }

    /// Invoke the action bound to item `id` on its instrument
    fn trigger_action(&self, id: ItemId, arg: Option<f64>) {
        let base = self.items[id].base();
        let (Some(channel), Some(action)) = (base.channel, base.action.as_deref()) else {
            let cell = base.grid.unwrap_or_default();
            self.logger.warn(format!(
                "Item at ({}, {}) missing channel or action",
                cell.x, cell.y
            ));
            return;
        };

        match self.registry.dispatch(channel, action, arg) {
            Ok(()) => debug!("Action '{}' sent to channel {}", action, channel),
            Err(RegistryError::UnknownChannel(channel)) => {
                self.logger
                    .warn(format!("No instrument found for channel {}", channel));
            }
            Err(RegistryError::Busy(channel)) => {
                self.logger
                    .warn(format!("Instrument {} busy, action skipped", channel));
            }
            Err(e) => self.logger.error(format!("Error executing action: {}", e)),
        }
    }
}
