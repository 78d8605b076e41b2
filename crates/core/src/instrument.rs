//! Instrument trait and related types

use crate::logger::Logger;
use anyhow::Result;
use labterm_types::{ChannelId, FieldMetadata, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Trait for all instruments
///
/// Instruments are user-supplied data sources (a power supply, a sensor, a
/// remote host) identified by a channel. The dashboard calls [`refresh`]
/// periodically from a background worker and reads the reported values
/// afterwards; [`action`] is called from the render loop when the user
/// activates an item bound to the instrument.
///
/// [`refresh`]: Instrument::refresh
/// [`action`]: Instrument::action
pub trait Instrument: Send {
    /// Channel this instrument answers on
    fn channel(&self) -> ChannelId;

    /// Refresh the reported values
    ///
    /// Errors are caught and logged by the poller.
    fn refresh(&mut self) -> Result<()>;

    /// Currently reported values, keyed by field name
    fn values(&self) -> &HashMap<String, Value>;

    /// Get a specific value by key
    fn value(&self, key: &str) -> Option<&Value> {
        self.values().get(key)
    }

    /// Perform an action requested by a dashboard item
    ///
    /// `arg` carries the committed number for editable items and is `None`
    /// for switches.
    fn action(&mut self, action_id: &str, arg: Option<f64>) -> Result<()>;

    /// Describe the fields this instrument reports
    fn fields(&self) -> Vec<FieldMetadata> {
        Vec::new()
    }

    /// Receive the dashboard's log sink
    fn attach_logger(&mut self, _logger: Logger) {}
}

/// Type-erased instrument for dynamic dispatch
pub type BoxedInstrument = Box<dyn Instrument>;

/// Instrument shared between the poller and the render loop
pub type SharedInstrument = Arc<Mutex<BoxedInstrument>>;
