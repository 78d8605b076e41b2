//! Dashboard options

use labterm_core::{
    PollerConfig, DEFAULT_MAX_LOG_MESSAGES, DEFAULT_POLL_TIMEOUT, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_UPDATE_INTERVAL, DEFAULT_WORKERS, ERROR_BACKOFF,
};
use labterm_types::GridPos;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Help text shown in the controls section when none is configured
pub fn default_controls_text() -> Vec<String> {
    vec![
        "\u{2191}/\u{2193}/\u{2190}/\u{2192} - Navigate items               i - Invert colors"
            .to_string(),
        "Enter - Toggle switch / Edit value     Numbers - Enter values (when editing)"
            .to_string(),
        "Esc - Cancel edit                      q - Quit".to_string(),
    ]
}

/// Everything that shapes a dashboard apart from its instruments and items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Pause between instrument poll cycles, in milliseconds
    pub update_interval_ms: u64,
    /// Wrap the cursor around at the edges of the grid
    pub cycle: bool,
    /// Text drawn top left
    pub header: String,
    /// Show the clock in the header row
    pub show_time: bool,
    pub show_log: bool,
    pub show_controls: bool,
    pub controls_text: Vec<String>,
    /// Initial cursor position
    pub grid_start: GridPos,
    pub max_log_messages: usize,
    /// Longest a single instrument refresh may take, in milliseconds
    pub poll_timeout_ms: u64,
    /// Concurrent instrument refreshes
    pub workers: usize,
    /// Pending update batches held for the render loop
    pub queue_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: DEFAULT_UPDATE_INTERVAL.as_millis() as u64,
            cycle: true,
            header: String::new(),
            show_time: true,
            show_log: true,
            show_controls: true,
            controls_text: default_controls_text(),
            grid_start: GridPos::default(),
            max_log_messages: DEFAULT_MAX_LOG_MESSAGES,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT.as_millis() as u64,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl DashboardConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    /// Poll loop tuning derived from these options
    pub fn poller_config(&self) -> PollerConfig {
        PollerConfig {
            interval: self.update_interval(),
            timeout: self.poll_timeout(),
            workers: self.workers.max(1),
            error_backoff: ERROR_BACKOFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.update_interval(), Duration::from_millis(300));
        assert!(config.cycle);
        assert_eq!(config.max_log_messages, 6);
        assert_eq!(config.controls_text.len(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"header": "Bench", "cycle": false, "workers": 0}"#).unwrap();
        assert_eq!(config.header, "Bench");
        assert!(!config.cycle);
        assert!(config.show_log);
        assert_eq!(config.poller_config().workers, 1);
        assert_eq!(config.poller_config().error_backoff, Duration::from_secs(1));
    }
}
