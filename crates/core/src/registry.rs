//! Registry of instruments keyed by channel

use crate::constants::{ACTION_LOCK_RETRY, ACTION_LOCK_WAIT};
use crate::instrument::{BoxedInstrument, SharedInstrument};
use labterm_types::ChannelId;
use log::warn;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from dispatching an action through the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no instrument found for channel {0}")]
    UnknownChannel(ChannelId),

    #[error("instrument on channel {0} is poisoned by an earlier panic")]
    Poisoned(ChannelId),

    #[error("instrument on channel {0} is busy with a refresh")]
    Busy(ChannelId),

    #[error("action '{action}' on channel {channel} failed: {source}")]
    Action {
        channel: ChannelId,
        action: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Instruments keyed by channel
///
/// Registering a second instrument on an occupied channel replaces the
/// first one.
#[derive(Default)]
pub struct InstrumentRegistry {
    instruments: BTreeMap<ChannelId, SharedInstrument>,
}

impl InstrumentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instrument under its own channel
    ///
    /// Returns the instrument previously registered on that channel, if any.
    pub fn register(&mut self, instrument: BoxedInstrument) -> Option<SharedInstrument> {
        let channel = instrument.channel();
        let previous = self
            .instruments
            .insert(channel, Arc::new(Mutex::new(instrument)));
        if previous.is_some() {
            warn!("Instrument on channel {} replaced", channel);
        }
        previous
    }

    pub fn get(&self, channel: ChannelId) -> Option<&SharedInstrument> {
        self.instruments.get(&channel)
    }

    pub fn contains(&self, channel: ChannelId) -> bool {
        self.instruments.contains_key(&channel)
    }

    /// Registered channels in ascending order
    pub fn channels(&self) -> Vec<ChannelId> {
        self.instruments.keys().copied().collect()
    }

    /// Shared handles in channel order, for handing to the poller
    pub fn handles(&self) -> Vec<(ChannelId, SharedInstrument)> {
        self.instruments
            .iter()
            .map(|(channel, handle)| (*channel, Arc::clone(handle)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Invoke `action` on the instrument registered on `channel`
    ///
    /// Waits at most [`ACTION_LOCK_WAIT`] for a running refresh of the same
    /// instrument, then gives up with [`RegistryError::Busy`].
    pub fn dispatch(
        &self,
        channel: ChannelId,
        action: &str,
        arg: Option<f64>,
    ) -> Result<(), RegistryError> {
        self.dispatch_within(channel, action, arg, ACTION_LOCK_WAIT)
    }

    /// [`dispatch`](Self::dispatch) with an explicit lock wait
    pub fn dispatch_within(
        &self,
        channel: ChannelId,
        action: &str,
        arg: Option<f64>,
        wait: Duration,
    ) -> Result<(), RegistryError> {
        let handle = self
            .instruments
            .get(&channel)
            .ok_or(RegistryError::UnknownChannel(channel))?;
        let mut instrument = lock_within(handle, channel, wait)?;
        instrument
            .action(action, arg)
            .map_err(|source| RegistryError::Action {
                channel,
                action: action.to_string(),
                source,
            })
    }
}

/// Take the instrument lock, retrying until `wait` has passed
///
/// A refresh abandoned by the poller can hold the lock indefinitely, so
/// actions never block on it.
fn lock_within(
    handle: &SharedInstrument,
    channel: ChannelId,
    wait: Duration,
) -> Result<MutexGuard<'_, BoxedInstrument>, RegistryError> {
    let deadline = Instant::now() + wait;
    loop {
        match handle.try_lock() {
            Ok(guard) => return Ok(guard),
            Err(TryLockError::Poisoned(_)) => return Err(RegistryError::Poisoned(channel)),
            Err(TryLockError::WouldBlock) => {
                if Instant::now() >= deadline {
                    return Err(RegistryError::Busy(channel));
                }
                std::thread::sleep(ACTION_LOCK_RETRY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Instrument;
    use anyhow::{bail, Result};
    use labterm_types::Value;
    use std::collections::HashMap;

    struct Counter {
        channel: ChannelId,
        values: HashMap<String, Value>,
        hits: u32,
    }

    impl Counter {
        fn boxed(channel: ChannelId) -> BoxedInstrument {
            Box::new(Self {
                channel,
                values: HashMap::new(),
                hits: 0,
            })
        }
    }

    impl Instrument for Counter {
        fn channel(&self) -> ChannelId {
            self.channel
        }

        fn refresh(&mut self) -> Result<()> {
            self.values
                .insert("hits".to_string(), Value::from(self.hits));
            Ok(())
        }

        fn values(&self) -> &HashMap<String, Value> {
            &self.values
        }

        fn action(&mut self, action_id: &str, _arg: Option<f64>) -> Result<()> {
            match action_id {
                "hit" => {
                    self.hits += 1;
                    Ok(())
                }
                other => bail!("unsupported action {}", other),
            }
        }
    }

    #[test]
    fn test_register_replaces_same_channel() {
        let mut registry = InstrumentRegistry::new();
        assert!(registry.register(Counter::boxed(1)).is_none());
        assert!(registry.register(Counter::boxed(0)).is_none());
        assert!(registry.register(Counter::boxed(1)).is_some());
        assert_eq!(registry.channels(), vec![0, 1]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_dispatch_reaches_instrument() {
        let mut registry = InstrumentRegistry::new();
        registry.register(Counter::boxed(2));

        registry.dispatch(2, "hit", None).unwrap();
        registry.dispatch(2, "hit", None).unwrap();

        let handle = registry.get(2).unwrap();
        let mut instrument = handle.lock().unwrap();
        instrument.refresh().unwrap();
        assert_eq!(instrument.value("hits"), Some(&Value::from(2)));
    }

    #[test]
    fn test_dispatch_errors() {
        let mut registry = InstrumentRegistry::new();
        registry.register(Counter::boxed(0));

        assert!(matches!(
            registry.dispatch(9, "hit", None),
            Err(RegistryError::UnknownChannel(9))
        ));
        let err = registry.dispatch(0, "explode", None).unwrap_err();
        assert!(matches!(err, RegistryError::Action { channel: 0, .. }));
        assert!(err.to_string().contains("explode"));
    }

    #[test]
    fn test_dispatch_gives_up_on_held_instrument() {
        let mut registry = InstrumentRegistry::new();
        registry.register(Counter::boxed(4));
        let handle = Arc::clone(registry.get(4).unwrap());
        let held = handle.lock().unwrap();

        let start = Instant::now();
        let result = registry.dispatch_within(4, "hit", None, Duration::from_millis(30));
        assert!(matches!(result, Err(RegistryError::Busy(4))));
        assert!(start.elapsed() < Duration::from_secs(1));

        drop(held);
        registry.dispatch(4, "hit", None).unwrap();
    }
}
