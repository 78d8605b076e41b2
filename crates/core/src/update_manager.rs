//! Update manager for polling instruments in the background
//!
//! Each cycle refreshes every registered instrument on a bounded pool of
//! blocking workers, collects the values the dashboard items are bound to,
//! and pushes them to the render loop as a single [`UpdateBatch`].

use crate::constants::{
    DEFAULT_POLL_TIMEOUT, DEFAULT_UPDATE_INTERVAL, DEFAULT_WORKERS, ERROR_BACKOFF,
};
use crate::instrument::SharedInstrument;
use crate::logger::Logger;
use crate::update::{BindingTable, ItemId, UpdateBatch};
use crossbeam::channel::{Sender, TrySendError};
use labterm_types::{ChannelId, Value};
use log::{debug, error, info, trace, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, TryLockError};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Why a single instrument refresh produced no values
#[derive(Debug, Error)]
pub enum PollError {
    #[error("previous refresh still running")]
    Busy,

    #[error("refresh timed out after {0:?}")]
    TimedOut(Duration),

    #[error("instrument lock poisoned")]
    Poisoned,

    #[error("refresh panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(#[source] anyhow::Error),
}

/// Tuning for the poll loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollerConfig {
    /// Pause between cycles
    pub interval: Duration,
    /// Per-instrument refresh timeout
    pub timeout: Duration,
    /// Concurrent refreshes
    pub workers: usize,
    /// Pause after a cycle with failures
    pub error_backoff: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_UPDATE_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
            workers: DEFAULT_WORKERS,
            error_backoff: ERROR_BACKOFF,
        }
    }
}

/// Outcome of one poll cycle
#[derive(Debug, Default)]
pub struct CycleReport {
    pub batch: UpdateBatch,
    /// Instruments that failed, timed out or panicked
    pub failures: Vec<(ChannelId, PollError)>,
    /// Instruments skipped because an abandoned refresh still holds them
    pub busy: Vec<ChannelId>,
}

impl CycleReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Control handle for a poller running on its own thread
pub struct PollerHandle {
    running: Arc<AtomicBool>,
    interval_ms: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Change the pause between cycles, effective from the next cycle
    pub fn set_interval(&self, interval: Duration) {
        self.interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Ask the poller to stop after its current cycle
    ///
    /// Does not wait: a refresh stuck inside an instrument must not hold up
    /// shutdown.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        // Detach; the thread exits on its own once the cycle ends
        self.thread.take();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Manages periodic refreshes of all instruments
pub struct UpdateManager {
    instruments: Vec<(ChannelId, SharedInstrument)>,
    bindings: Arc<BindingTable>,
    sender: Sender<UpdateBatch>,
    logger: Logger,
    config: PollerConfig,
    running: Arc<AtomicBool>,
    interval_ms: Arc<AtomicU64>,
}

impl UpdateManager {
    /// Create a new update manager
    pub fn new(
        instruments: Vec<(ChannelId, SharedInstrument)>,
        bindings: BindingTable,
        sender: Sender<UpdateBatch>,
        logger: Logger,
        config: PollerConfig,
    ) -> Self {
        Self {
            instruments,
            bindings: Arc::new(bindings),
            sender,
            logger,
            interval_ms: Arc::new(AtomicU64::new(config.interval.as_millis() as u64)),
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Run the poll loop on a dedicated thread with its own tokio runtime
    pub fn spawn(self) -> std::io::Result<PollerHandle> {
        let running = Arc::clone(&self.running);
        let interval_ms = Arc::clone(&self.interval_ms);

        let thread = std::thread::Builder::new()
            .name("labterm-poller".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        self.running.store(false, Ordering::Relaxed);
                        return;
                    }
                };
                info!("Starting poll loop for {} instruments", self.instruments.len());
                rt.block_on(self.run());
                // Abandoned refreshes may still be blocked inside an instrument
                rt.shutdown_background();
            })?;

        Ok(PollerHandle {
            running,
            interval_ms,
            thread: Some(thread),
        })
    }

    /// Start the poll loop
    ///
    /// This runs until the running flag is cleared or the render loop drops
    /// its end of the queue.
    pub async fn run(&self) {
        while self.running.load(Ordering::Relaxed) {
            let start = Instant::now();
            let report = self.poll_cycle().await;
            trace!("Poll cycle took {:?}", start.elapsed());

            let pause = if report.has_failures() {
                self.config.error_backoff
            } else {
                Duration::from_millis(self.interval_ms.load(Ordering::Relaxed))
            };

            if !report.batch.is_empty() {
                match self.sender.try_send(report.batch) {
                    Ok(()) => {}
                    Err(TrySendError::Full(batch)) => {
                        trace!("Update queue full, dropping batch of {}", batch.len());
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        debug!("Update queue closed, stopping poll loop");
                        self.running.store(false, Ordering::Relaxed);
                        break;
                    }
                }
            }

            tokio::time::sleep(pause).await;
        }
    }

    /// Refresh every instrument once and collect bound values
    ///
    /// Failures are logged here and reported back; nothing is sent.
    pub async fn poll_cycle(&self) -> CycleReport {
        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let timeout = self.config.timeout;
        let mut tasks = Vec::with_capacity(self.instruments.len());

        for (channel, instrument) in &self.instruments {
            let channel = *channel;
            let instrument = Arc::clone(instrument);
            let bindings = Arc::clone(&self.bindings);
            let semaphore = Arc::clone(&semaphore);

            let task = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| PollError::Panicked(e.to_string()))?;
                let blocking = tokio::task::spawn_blocking(move || {
                    refresh_instrument(channel, &instrument, &bindings)
                });
                match tokio::time::timeout(timeout, blocking).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_err)) => Err(PollError::Panicked(join_err.to_string())),
                    Err(_) => Err(PollError::TimedOut(timeout)),
                }
            });
            tasks.push((channel, task));
        }

        let mut report = CycleReport::default();
        for (channel, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(join_err) => Err(PollError::Panicked(join_err.to_string())),
            };
            match result {
                Ok(mut updates) => report.batch.updates.append(&mut updates),
                Err(PollError::Busy) => {
                    warn!("Instrument {} still busy, skipping this cycle", channel);
                    report.busy.push(channel);
                }
                Err(e) => {
                    self.logger
                        .error(format!("Error updating instrument {}: {}", channel, e));
                    report.failures.push((channel, e));
                }
            }
        }

        report
    }
}

fn refresh_instrument(
    channel: ChannelId,
    instrument: &SharedInstrument,
    bindings: &BindingTable,
) -> Result<Vec<(ItemId, Value)>, PollError> {
    let mut guard = match instrument.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => return Err(PollError::Busy),
        Err(TryLockError::Poisoned(_)) => return Err(PollError::Poisoned),
    };
    guard.refresh().map_err(PollError::Failed)?;

    let mut updates = Vec::new();
    bindings.collect(channel, guard.values(), &mut updates);
    Ok(updates)
}
