//! labterm-core: Instrument trait, registry and background poller.
//!
//! This crate contains the contract user code implements ([`Instrument`]),
//! the channel-keyed [`InstrumentRegistry`], the log sink handed to
//! instruments, and the [`UpdateManager`] that refreshes instruments in the
//! background and feeds value batches to the render loop.

pub mod constants;
mod instrument;
mod logger;
mod registry;
mod update;
mod update_manager;

pub use constants::{
    ACTION_LOCK_WAIT, DEFAULT_MAX_LOG_MESSAGES, DEFAULT_POLL_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_UPDATE_INTERVAL, DEFAULT_WORKERS, ERROR_BACKOFF, INPUT_POLL_TIMEOUT,
};
pub use instrument::{BoxedInstrument, Instrument, SharedInstrument};
pub use logger::{LogEntry, LogTail, Logger};
pub use registry::{InstrumentRegistry, RegistryError};
pub use update::{update_queue, Binding, BindingTable, ItemId, UpdateBatch};
pub use update_manager::{CycleReport, PollError, PollerConfig, PollerHandle, UpdateManager};

// Re-export types used in trait signatures for convenience
pub use labterm_types::{ChannelId, FieldMetadata, FieldType, Value};
