//! Integration tests for the dashboard render loop.
//!
//! These drive a [`Dashboard`] with scripted keys and a recording
//! instrument, render into ratatui's test backend, and check what the user
//! would see and which actions reach the instrument.

use anyhow::{bail, Result};
use labterm::instruments::StaticInstrument;
use labterm::{
    Dashboard, DashboardConfig, DashboardItem, Editable, GridPos, Instrument, Key, Label, Light,
    Mode, Placement, Readonly, Switch, Value,
};
use labterm_core::{ChannelId, UpdateBatch};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Modifier;
use ratatui::Terminal;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type Calls = Arc<Mutex<Vec<(String, Option<f64>)>>>;

/// Records every action it receives; the `fail` action errors
struct Recorder {
    channel: ChannelId,
    values: HashMap<String, Value>,
    calls: Calls,
}

impl Recorder {
    fn new(channel: ChannelId) -> (Self, Calls) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = Self {
            channel,
            values: HashMap::new(),
            calls: Arc::clone(&calls),
        };
        (recorder, calls)
    }
}

impl Instrument for Recorder {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    fn action(&mut self, action_id: &str, arg: Option<f64>) -> Result<()> {
        if action_id == "fail" {
            bail!("relay stuck");
        }
        self.calls
            .lock()
            .unwrap()
            .push((action_id.to_string(), arg));
        Ok(())
    }
}

/// Refresh never finishes within any sensible poll timeout
struct Sluggish {
    channel: ChannelId,
    values: HashMap<String, Value>,
    delay: Duration,
}

impl Instrument for Sluggish {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    fn refresh(&mut self) -> Result<()> {
        std::thread::sleep(self.delay);
        Ok(())
    }

    fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    fn action(&mut self, _action_id: &str, _arg: Option<f64>) -> Result<()> {
        Ok(())
    }
}

fn quiet_config() -> DashboardConfig {
    DashboardConfig {
        show_time: false,
        show_log: false,
        show_controls: false,
        ..DashboardConfig::default()
    }
}

fn press(dashboard: &mut Dashboard, keys: &[Key]) {
    for key in keys {
        dashboard.handle_key(*key);
    }
}

fn type_text(dashboard: &mut Dashboard, text: &str) {
    for c in text.chars() {
        dashboard.handle_key(Key::Char(c));
    }
}

fn log_messages(dashboard: &mut Dashboard) -> Vec<String> {
    dashboard.drain_logs();
    dashboard
        .log_tail()
        .iter()
        .map(|entry| entry.message.clone())
        .collect()
}

fn row_text(buf: &Buffer, row: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf[(x, row)].symbol().to_string())
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Run the render loop on a test terminal, feeding `keys` then quitting
fn run_scripted(dashboard: &mut Dashboard, keys: Vec<Key>, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    let mut keys: VecDeque<Key> = keys.into();
    dashboard
        .run_on(&mut terminal, |_timeout| Some(keys.pop_front().unwrap_or(Key::Interrupt)))
        .unwrap();
    terminal.backend().buffer().clone()
}

// ── Navigation ──────────────────────────────────────────────────────────

#[test]
fn test_right_walks_and_wraps_between_two_items() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "a", "toggle:a"));
    dashboard.add_item(Switch::new(Placement::cell(8, 1), GridPos::new(1, 0), 0, "b", "toggle:b"));

    press(&mut dashboard, &[Key::Right]);
    assert_eq!(dashboard.cursor(), GridPos::new(1, 0));
    assert_eq!(dashboard.selected_item(), Some(1));

    press(&mut dashboard, &[Key::Right]);
    assert_eq!(dashboard.cursor(), GridPos::new(0, 0));
    assert_eq!(dashboard.selected_item(), Some(0));
}

#[test]
fn test_grid_start_sets_initial_cursor() {
    let mut dashboard = Dashboard::new(DashboardConfig {
        grid_start: GridPos::new(1, 0),
        ..quiet_config()
    });
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "a", "toggle:a"));
    dashboard.add_item(Switch::new(Placement::cell(8, 1), GridPos::new(1, 0), 0, "b", "toggle:b"));
    assert_eq!(dashboard.selected_item(), Some(1));
}

#[test]
fn test_only_one_item_drawn_selected() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "a", "toggle:a"));
    dashboard.add_item(Switch::new(Placement::cell(0, 2), GridPos::new(0, 0), 0, "b", "toggle:b"));
    dashboard.add_item(Switch::new(Placement::cell(0, 3), GridPos::new(1, 0), 0, "c", "toggle:c"));

    let buf = run_scripted(&mut dashboard, vec![], 20, 5);
    assert!(buf[(0, 1)].modifier.contains(Modifier::REVERSED));
    assert!(!buf[(0, 2)].modifier.contains(Modifier::REVERSED));
    assert!(!buf[(0, 3)].modifier.contains(Modifier::REVERSED));
}

// ── Updates ─────────────────────────────────────────────────────────────

#[test]
fn test_last_write_wins_across_batches() {
    let mut dashboard = Dashboard::new(quiet_config());
    let volts = dashboard.add_item(Readonly::new(Placement::cell(0, 1), 0, "v"));
    let lamp = dashboard.add_item(Light::new(Placement::cell(0, 2), 0, "lamp"));

    dashboard.apply_batch(UpdateBatch {
        updates: vec![(volts, json!(1.0)), (lamp, json!(true)), (volts, json!(2.0))],
    });
    dashboard.apply_batch(UpdateBatch {
        updates: vec![(volts, json!(3.5)), (99, json!("ignored"))],
    });

    assert_eq!(dashboard.item(volts).unwrap().value(), &json!(3.5));
    assert_eq!(dashboard.item(lamp).unwrap().value(), &json!(true));
}

#[test]
fn test_bindings_cover_bound_items_only() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_item(Label::new(Placement::cell(0, 0), "title"));
    dashboard.add_item(Readonly::new(Placement::cell(0, 1), 3, "v"));
    let bindings = dashboard.bindings();
    assert!(bindings.watches(3));
    assert!(!bindings.watches(0));
}

// ── Actions and editing ─────────────────────────────────────────────────

#[test]
fn test_switch_enter_invokes_action_without_argument() {
    let (recorder, calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "power", "toggle:power"));

    press(&mut dashboard, &[Key::Enter]);
    assert_eq!(*calls.lock().unwrap(), vec![("toggle:power".to_string(), None)]);
    assert_eq!(dashboard.mode(), Mode::Navigating);
}

#[test]
fn test_edit_commit_sends_parsed_value() {
    let (recorder, calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    let id = dashboard.add_item(Editable::new(
        Placement::cell(0, 1),
        GridPos::new(0, 0),
        0,
        "target",
        "set_target",
    ));

    press(&mut dashboard, &[Key::Enter]);
    assert_eq!(dashboard.mode(), Mode::Editing(id));
    type_text(&mut dashboard, "12.5");
    press(&mut dashboard, &[Key::Enter]);

    assert_eq!(dashboard.mode(), Mode::Navigating);
    assert_eq!(*calls.lock().unwrap(), vec![("set_target".to_string(), Some(12.5))]);
    assert_eq!(dashboard.item(id).unwrap().value(), &json!(12.5));
}

#[test]
fn test_edit_parse_failure_sends_zero() {
    let (recorder, calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    dashboard.add_item(Editable::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "t", "set"));

    press(&mut dashboard, &[Key::Enter]);
    type_text(&mut dashboard, "-");
    press(&mut dashboard, &[Key::Enter]);

    assert_eq!(dashboard.mode(), Mode::Navigating);
    assert_eq!(*calls.lock().unwrap(), vec![("set".to_string(), Some(0.0))]);
}

#[test]
fn test_edit_escape_sends_nothing() {
    let (recorder, calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    dashboard.add_item(Editable::new(Placement::cell(0, 1), GridPos::new(0, 0), 0, "t", "set"));

    press(&mut dashboard, &[Key::Enter]);
    type_text(&mut dashboard, "42");
    press(&mut dashboard, &[Key::Backspace, Key::Esc]);

    assert_eq!(dashboard.mode(), Mode::Navigating);
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_edit_buffer_is_drawn() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_item(Editable::new(Placement::cell(2, 1), GridPos::new(0, 0), 0, "t", "set"));

    let keys = vec![Key::Enter, Key::Char('7'), Key::Char('.'), Key::Char('2')];
    let buf = run_scripted(&mut dashboard, keys, 20, 3);
    // The last frame was drawn mid-edit; quitting then left edit mode
    assert_eq!(row_text(&buf, 1), "  >7.2_");
    assert_eq!(dashboard.mode(), Mode::Navigating);
}

#[test]
fn test_missing_action_is_warned() {
    let (recorder, calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    let mut switch = Switch::new(Placement::cell(0, 1), GridPos::new(2, 1), 0, "p", "toggle");
    switch.base_mut().action = None;
    dashboard.add_item(switch);

    press(&mut dashboard, &[Key::Right, Key::Right, Key::Down, Key::Enter]);
    assert_eq!(dashboard.cursor(), GridPos::new(2, 1));
    assert_eq!(log_messages(&mut dashboard), vec!["Item at (2, 1) missing channel or action"]);
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_unknown_channel_and_failing_action_are_logged() {
    let (recorder, _calls) = Recorder::new(0);
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(recorder);
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 5, "p", "toggle"));
    dashboard.add_item(Switch::new(Placement::cell(0, 2), GridPos::new(1, 0), 0, "p", "fail"));

    press(&mut dashboard, &[Key::Enter, Key::Right, Key::Enter]);
    let messages = log_messages(&mut dashboard);
    assert_eq!(messages[0], "No instrument found for channel 5");
    assert!(messages[1].starts_with("Error executing action"));
    assert!(messages[1].contains("relay stuck"));
}

// ── Render loop ─────────────────────────────────────────────────────────

#[test]
fn test_run_on_draws_and_quits_on_q() {
    let mut dashboard = Dashboard::new(DashboardConfig {
        header: "Cryostat".to_string(),
        ..quiet_config()
    });
    dashboard.add_item(Label::new(Placement::cell(0, 2), "Stage temp"));

    let keys = vec![Key::Char('i'), Key::Char('q'), Key::Char('i')];
    let buf = run_scripted(&mut dashboard, keys, 30, 4);

    assert!(!dashboard.is_running());
    // `q` stopped the loop before the second `i`
    assert!(dashboard.is_inverted());
    assert_eq!(row_text(&buf, 0), "Cryostat");
    assert_eq!(row_text(&buf, 2), "Stage temp");
}

#[test]
fn test_instrument_log_lines_are_prefixed() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(StaticInstrument::new(7));
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 7, "fan", "toggle:fan"));

    press(&mut dashboard, &[Key::Enter]);
    assert_eq!(log_messages(&mut dashboard), vec!["Instrument 7: fan -> ON"]);
}

#[test]
fn test_poller_feeds_values_back() {
    let mut dashboard = Dashboard::new(DashboardConfig {
        update_interval_ms: 10,
        ..quiet_config()
    });
    dashboard.add_instrument(StaticInstrument::new(0).with_value("power", false));
    let switch = dashboard.add_item(Switch::new(
        Placement::cell(0, 1),
        GridPos::new(0, 0),
        0,
        "power",
        "toggle:power",
    ));
    dashboard.start_polling().unwrap();
    assert!(dashboard.is_polling());

    press(&mut dashboard, &[Key::Enter]);

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        dashboard.drain_updates();
        if dashboard.item(switch).unwrap().value() == &json!(true) {
            break;
        }
        assert!(Instant::now() < deadline, "switch never turned on");
        std::thread::sleep(Duration::from_millis(10));
    }

    dashboard.stop_polling();
    assert!(!dashboard.is_polling());
}

#[test]
fn test_hung_refresh_does_not_block_actions_or_quit() {
    let mut dashboard = Dashboard::new(DashboardConfig {
        poll_timeout_ms: 50,
        update_interval_ms: 10,
        ..quiet_config()
    });
    dashboard.add_instrument(Sluggish {
        channel: 3,
        values: HashMap::new(),
        delay: Duration::from_secs(3),
    });
    dashboard.add_item(Switch::new(Placement::cell(0, 1), GridPos::new(0, 0), 3, "pump", "toggle:pump"));
    dashboard.start_polling().unwrap();
    // Let the first refresh start and time out
    std::thread::sleep(Duration::from_millis(200));

    let start = Instant::now();
    assert!(dashboard.handle_key(Key::Enter));
    assert!(start.elapsed() < Duration::from_millis(500), "Enter blocked for {:?}", start.elapsed());
    assert!(log_messages(&mut dashboard)
        .iter()
        .any(|message| message == "Instrument 3 busy, action skipped"));

    let start = Instant::now();
    assert!(!dashboard.handle_key(Key::Char('q')));
    assert!(start.elapsed() < Duration::from_millis(500));
    dashboard.stop_polling();
}

#[test]
fn test_late_additions_are_warned() {
    let mut dashboard = Dashboard::new(quiet_config());
    dashboard.add_instrument(StaticInstrument::new(0).with_value("power", false));
    dashboard.add_item(Readonly::new(Placement::cell(0, 1), 0, "power"));
    dashboard.start_polling().unwrap();

    let late = dashboard.add_item(Readonly::new(Placement::cell(0, 2), 0, "power"));
    dashboard.add_instrument(StaticInstrument::new(1));
    dashboard.stop_polling();

    let messages = log_messages(&mut dashboard);
    assert!(messages.contains(&format!(
        "Item {} added while polling; it is updated after a restart",
        late
    )));
    assert!(messages
        .iter()
        .any(|message| message == "Instrument 1 added while polling; it is polled after a restart"));
}
