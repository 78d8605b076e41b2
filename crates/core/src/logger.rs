//! On-screen log sink
//!
//! Messages from the poller, the dashboard and instruments travel over an
//! unbounded channel to the render loop, which keeps the newest few in a
//! [`LogTail`]. Every message is also forwarded to the `log` facade.

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::Level;
use std::collections::VecDeque;

/// A single timestamped log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        }
    }

    /// Display form: `[HH:MM:SS] message`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.timestamp, self.message)
    }
}

/// Cloneable handle for writing to the dashboard log
#[derive(Debug, Clone)]
pub struct Logger {
    tx: Sender<LogEntry>,
    prefix: Option<String>,
}

impl Logger {
    /// Create a logger and the receiving end the render loop drains
    pub fn channel() -> (Self, Receiver<LogEntry>) {
        let (tx, rx) = unbounded();
        (Self { tx, prefix: None }, rx)
    }

    /// A logger that prepends `prefix: ` to every message
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        Self {
            tx: self.tx.clone(),
            prefix: Some(prefix.into()),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.emit(Level::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::Error, message.as_ref());
    }

    fn emit(&self, level: Level, message: &str) {
        let message = match &self.prefix {
            Some(prefix) => format!("{}: {}", prefix, message),
            None => message.to_string(),
        };
        log::log!(target: "labterm", level, "{}", message);
        // Receiver gone means the dashboard has shut down
        let _ = self.tx.send(LogEntry::new(level, message));
    }
}

/// Bounded list of the most recent log entries, oldest first
#[derive(Debug, Clone)]
pub struct LogTail {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogTail {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        self.trim();
    }

    /// Move every pending entry from `rx` into the tail
    pub fn drain_from(&mut self, rx: &Receiver<LogEntry>) {
        for entry in rx.try_iter() {
            self.push(entry);
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.trim();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trim(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_line_format() {
        let (logger, rx) = Logger::channel();
        logger.with_prefix("Instrument 3").warn("overcurrent");

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, Level::Warn);
        assert_eq!(entry.message, "Instrument 3: overcurrent");
        assert!(entry.line().starts_with('['));
        assert!(entry.line().ends_with("] Instrument 3: overcurrent"));
        assert_eq!(entry.timestamp.len(), 8);
    }

    #[test]
    fn test_tail_keeps_newest() {
        let (logger, rx) = Logger::channel();
        for i in 0..10 {
            logger.info(format!("msg {}", i));
        }

        let mut tail = LogTail::new(3);
        tail.drain_from(&rx);
        let messages: Vec<_> = tail.iter().map(|e| e.message.clone()).collect();
        assert_eq!(messages, vec!["msg 7", "msg 8", "msg 9"]);
    }

    #[test]
    fn test_shrinking_capacity_drops_oldest() {
        let mut tail = LogTail::new(4);
        for i in 0..4 {
            tail.push(LogEntry::new(Level::Info, format!("{}", i)));
        }
        tail.set_capacity(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.iter().next().unwrap().message, "2");
    }

    #[test]
    fn test_logging_after_receiver_dropped_is_silent() {
        let (logger, rx) = Logger::channel();
        drop(rx);
        logger.error("nobody listening");
    }
}
