//! Shared constants for the dashboard

use std::time::Duration;

/// Default pause between two instrument poll cycles
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(300);

/// Pause after a poll cycle in which an instrument failed
pub const ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Longest a single instrument refresh may take before it is abandoned
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(2);

/// Concurrent instrument refreshes per cycle
pub const DEFAULT_WORKERS: usize = 4;

/// Pending update batches held between poller and render loop
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// How long the render loop waits for a key before redrawing
pub const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Longest an action waits for an instrument held by a refresh
pub const ACTION_LOCK_WAIT: Duration = INPUT_POLL_TIMEOUT;

/// Pause between attempts to take an instrument for an action
pub const ACTION_LOCK_RETRY: Duration = Duration::from_millis(5);

/// Log lines kept on screen
pub const DEFAULT_MAX_LOG_MESSAGES: usize = 6;
