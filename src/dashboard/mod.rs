//! The dashboard: instruments, items and the render loop
//!
//! A [`Dashboard`] owns every item and all display state. Instruments are
//! refreshed by a background [`UpdateManager`] that only sees a table of
//! item bindings; new values come back as [`UpdateBatch`]es that the render
//! loop applies before each frame.

mod input;

pub use input::Mode;

use crate::config::DashboardConfig;
use crate::items::{BoxedItem, DashboardItem};
use crate::ui::{self, render, theme::Palette};
use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, Sender};
use labterm_core::{
    update_queue, Binding, BindingTable, BoxedInstrument, Instrument, InstrumentRegistry,
    ItemId, LogEntry, LogTail, Logger, PollerHandle, UpdateBatch, UpdateManager,
    INPUT_POLL_TIMEOUT,
};
use labterm_types::{GridBounds, GridPos, Key};
use log::{debug, info};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::time::Duration;

pub struct Dashboard {
    config: DashboardConfig,
    registry: InstrumentRegistry,
    items: Vec<BoxedItem>,
    cursor: GridPos,
    mode: Mode,
    inverted: bool,
    running: bool,
    log_tail: LogTail,
    logger: Logger,
    log_rx: Receiver<LogEntry>,
    update_tx: Sender<UpdateBatch>,
    update_rx: Receiver<UpdateBatch>,
    poller: Option<PollerHandle>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let (logger, log_rx) = Logger::channel();
        let (update_tx, update_rx) = update_queue(config.queue_capacity);
        Self {
            cursor: config.grid_start,
            log_tail: LogTail::new(config.max_log_messages),
            config,
            registry: InstrumentRegistry::new(),
            items: Vec::new(),
            mode: Mode::Navigating,
            inverted: false,
            running: false,
            logger,
            log_rx,
            update_tx,
            update_rx,
            poller: None,
        }
    }

    /// Register an instrument under its channel, replacing any previous one
    pub fn add_instrument<I: Instrument + 'static>(&mut self, instrument: I) {
        self.add_boxed_instrument(Box::new(instrument));
    }

    pub fn add_boxed_instrument(&mut self, mut instrument: BoxedInstrument) {
        let channel = instrument.channel();
        instrument.attach_logger(self.logger.with_prefix(format!("Instrument {}", channel)));
        if self.poller.is_some() {
            self.logger.warn(format!(
                "Instrument {} added while polling; it is polled after a restart",
                channel
            ));
        }
        self.registry.register(instrument);
    }

    pub fn add_instruments<I>(&mut self, instruments: I)
    where
        I: IntoIterator<Item = BoxedInstrument>,
    {
        for instrument in instruments {
            self.add_boxed_instrument(instrument);
        }
    }

    /// Append an item; items are drawn in the order they were added
    pub fn add_item<I: DashboardItem + 'static>(&mut self, item: I) -> ItemId {
        self.add_boxed_item(Box::new(item))
    }

    pub fn add_boxed_item(&mut self, item: BoxedItem) -> ItemId {
        let id = self.items.len();
        debug!("Adding {} item {}", item.kind(), id);
        if self.poller.is_some() {
            self.logger.warn(format!(
                "Item {} added while polling; it is updated after a restart",
                id
            ));
        }
        self.items.push(item);
        id
    }

    pub fn add_items<I>(&mut self, items: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = BoxedItem>,
    {
        items
            .into_iter()
            .map(|item| self.add_boxed_item(item))
            .collect()
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.config.header = header.into();
    }

    /// Number of log lines kept and shown
    pub fn set_max_logs(&mut self, max: usize) {
        self.config.max_log_messages = max;
        self.log_tail.set_capacity(max);
    }

    /// Pause between poll cycles; applies to a running poller from its next cycle
    pub fn set_update_interval(&mut self, interval: Duration) {
        self.config.update_interval_ms = interval.as_millis() as u64;
        if let Some(poller) = &self.poller {
            poller.set_interval(interval);
        }
    }

    pub fn show_controls(&mut self, show: bool) {
        self.config.show_controls = show;
    }

    pub fn show_log(&mut self, show: bool) {
        self.config.show_log = show;
    }

    pub fn show_time(&mut self, show: bool) {
        self.config.show_time = show;
    }

    /// Wrap the cursor around at the grid edges
    pub fn set_cycle(&mut self, cycle: bool) {
        self.config.cycle = cycle;
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    pub fn items(&self) -> &[BoxedItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&dyn DashboardItem> {
        self.items.get(id).map(|item| item.as_ref())
    }

    pub fn cursor(&self) -> GridPos {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn palette(&self) -> Palette {
        Palette::for_inverted(self.inverted)
    }

    pub fn log_tail(&self) -> &LogTail {
        &self.log_tail
    }

    /// Handle for writing to the on-screen log
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Largest grid coordinates among navigable items
    pub fn grid_bounds(&self) -> Option<GridBounds> {
        GridBounds::from_positions(self.items.iter().filter_map(|item| item.grid()))
    }

    /// The navigable item under the cursor
    ///
    /// When several items share a cell, the first one added wins.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.items
            .iter()
            .position(|item| item.grid() == Some(self.cursor))
    }

    /// Which instrument fields each item mirrors
    pub fn bindings(&self) -> BindingTable {
        BindingTable::new(self.items.iter().enumerate().filter_map(|(item, entry)| {
            let base = entry.base();
            Some(Binding {
                item,
                channel: base.channel?,
                field: base.field.clone()?,
            })
        }))
    }

    /// Store new values; unknown item ids are ignored
    pub fn apply_batch(&mut self, batch: UpdateBatch) {
        for (id, value) in batch.updates {
            match self.items.get_mut(id) {
                Some(item) => item.set_value(value),
                None => debug!("Update for unknown item {}", id),
            }
        }
    }

    /// Apply every pending batch in arrival order; returns how many there were
    pub fn drain_updates(&mut self) -> usize {
        let batches: Vec<UpdateBatch> = self.update_rx.try_iter().collect();
        let count = batches.len();
        for batch in batches {
            self.apply_batch(batch);
        }
        count
    }

    /// Move pending log messages into the on-screen tail
    pub fn drain_logs(&mut self) {
        self.log_tail.drain_from(&self.log_rx);
    }

    /// Start refreshing instruments on a background thread
    ///
    /// Items and instruments added after this are not polled.
    pub fn start_polling(&mut self) -> std::io::Result<()> {
        if self.poller.is_some() {
            return Ok(());
        }
        if self.registry.is_empty() {
            debug!("No instruments registered, not starting the poller");
            return Ok(());
        }

        let manager = UpdateManager::new(
            self.registry.handles(),
            self.bindings(),
            self.update_tx.clone(),
            self.logger.clone(),
            self.config.poller_config(),
        );
        self.poller = Some(manager.spawn()?);
        info!(
            "Polling {} instruments every {:?}",
            self.registry.len(),
            self.config.update_interval()
        );
        Ok(())
    }

    pub fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| p.is_running())
    }

    /// Run on the real terminal until the user quits
    pub fn run(&mut self) -> Result<()> {
        ui::install_panic_hook();
        let mut terminal = ui::setup_terminal().context("Failed to set up terminal")?;

        let result = self
            .start_polling()
            .context("Failed to start the poller")
            .and_then(|()| {
                self.run_on(&mut terminal, ui::poll_key)
                    .context("Failed to draw dashboard")
            });

        self.stop_polling();
        ui::restore_terminal(&mut terminal).context("Failed to restore terminal")?;
        result
    }

    /// Render loop on any backend, reading keys from `next_key`
    ///
    /// `next_key` is called once per frame with the input timeout and
    /// returns `None` when no key arrived.
    pub fn run_on<B, F>(&mut self, terminal: &mut Terminal<B>, mut next_key: F) -> std::io::Result<()>
    where
        B: Backend,
        F: FnMut(Duration) -> Option<Key>,
    {
        self.running = true;
        while self.running {
            self.drain_updates();
            self.drain_logs();
            let view: &Dashboard = self;
            terminal.draw(|frame| render::draw(frame, view))?;

            if let Some(key) = next_key(INPUT_POLL_TIMEOUT) {
                self.handle_key(key);
            }
        }
        Ok(())
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
