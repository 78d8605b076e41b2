//! Value batches flowing from the poller to the render loop

use crossbeam::channel::{bounded, Receiver, Sender};
use labterm_types::{ChannelId, Value};
use std::collections::HashMap;

/// Index of an item in the dashboard's item list
pub type ItemId = usize;

/// An item bound to one field of one instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub item: ItemId,
    pub channel: ChannelId,
    pub field: String,
}

/// New values for a set of items, in the order they were read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBatch {
    pub updates: Vec<(ItemId, Value)>,
}

impl UpdateBatch {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }
}

/// Bounded queue between the poller and the render loop
pub fn update_queue(capacity: usize) -> (Sender<UpdateBatch>, Receiver<UpdateBatch>) {
    bounded(capacity.max(1))
}

/// Read-only view of which items watch which instrument fields
///
/// Built once before polling starts; the poller never sees the items
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    by_channel: HashMap<ChannelId, Vec<(ItemId, String)>>,
}

impl BindingTable {
    pub fn new<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = Binding>,
    {
        let mut by_channel: HashMap<ChannelId, Vec<(ItemId, String)>> = HashMap::new();
        for binding in bindings {
            by_channel
                .entry(binding.channel)
                .or_default()
                .push((binding.item, binding.field));
        }
        Self { by_channel }
    }

    /// Whether any item watches `channel`
    pub fn watches(&self, channel: ChannelId) -> bool {
        self.by_channel.contains_key(&channel)
    }

    /// Append `(item, value)` for every item bound to `channel` whose field
    /// has a non-null value in `values`
    pub fn collect(
        &self,
        channel: ChannelId,
        values: &HashMap<String, Value>,
        out: &mut Vec<(ItemId, Value)>,
    ) {
        let Some(bound) = self.by_channel.get(&channel) else {
            return;
        };
        for (item, field) in bound {
            match values.get(field) {
                Some(Value::Null) => {}
                Some(value) => out.push((*item, value.clone())),
                None => log::debug!(
                    "Channel {} does not report field '{}' (item {})",
                    channel,
                    field,
                    item
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binding(item: ItemId, channel: ChannelId, field: &str) -> Binding {
        Binding {
            item,
            channel,
            field: field.to_string(),
        }
    }

    #[test]
    fn test_collect_skips_null_and_missing() {
        let table = BindingTable::new(vec![
            binding(0, 1, "power"),
            binding(3, 1, "voltage"),
            binding(4, 1, "missing"),
            binding(5, 2, "power"),
        ]);

        let mut values = HashMap::new();
        values.insert("power".to_string(), json!(true));
        values.insert("voltage".to_string(), Value::Null);

        let mut out = Vec::new();
        table.collect(1, &values, &mut out);
        assert_eq!(out, vec![(0, json!(true))]);
    }

    #[test]
    fn test_unwatched_channel_collects_nothing() {
        let table = BindingTable::new(vec![binding(0, 1, "power")]);
        assert!(!table.watches(7));

        let mut values = HashMap::new();
        values.insert("power".to_string(), json!(false));
        let mut out = Vec::new();
        table.collect(7, &values, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let (tx, rx) = update_queue(2);
        assert!(tx.try_send(UpdateBatch::default()).is_ok());
        assert!(tx.try_send(UpdateBatch::default()).is_ok());
        assert!(tx.try_send(UpdateBatch::default()).is_err());
        assert_eq!(rx.try_iter().count(), 2);
    }
}
