//! Frame rendering
//!
//! Layout, top to bottom: the header row, the items wherever they placed
//! themselves, then the controls help and the log pinned to the bottom.
//! Regions that do not fit on a small terminal are cut off, never wrapped.

use super::surface::{text_width, Surface};
use super::theme::Palette;
use crate::dashboard::Dashboard;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Frame;

/// Column where section titles start
const TITLE_COLUMN: i32 = 4;

/// Draw the whole dashboard into a frame
pub fn draw(frame: &mut Frame, dashboard: &Dashboard) {
    let clock = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let area = frame.area();
    render_dashboard(frame.buffer_mut(), area, dashboard, &clock);
}

/// Draw the dashboard into `area` of `buf`, showing `clock` in the header
pub fn render_dashboard(buf: &mut Buffer, area: Rect, dashboard: &Dashboard, clock: &str) {
    let palette = dashboard.palette();
    let config = dashboard.config();
    let mut surface = Surface::new(buf, area);
    surface.fill(palette.default);

    draw_header(
        &mut surface,
        &palette,
        &config.header,
        config.show_time.then_some(clock),
    );

    let selected = dashboard.selected_item();
    for (id, item) in dashboard.items().iter().enumerate() {
        item.draw(&mut surface, &palette, selected == Some(id));
    }

    let height = i32::from(surface.height());
    let log_rows = if config.show_log {
        config.max_log_messages as i32
    } else {
        0
    };

    if config.show_controls {
        let lines = &config.controls_text;
        let start = height - log_rows - lines.len() as i32 - 1;
        section_title(&mut surface, &palette, "Controls", start - 1);
        for (i, line) in lines.iter().enumerate() {
            put_row(&mut surface, 0, start + i as i32, line, &palette);
        }
    }

    if config.show_log {
        section_title(&mut surface, &palette, "Log", height - log_rows - 1);
        for (i, entry) in dashboard.log_tail().iter().enumerate() {
            put_row(
                &mut surface,
                0,
                height - log_rows + i as i32,
                &entry.line(),
                &palette,
            );
        }
    }
}

fn draw_header(surface: &mut Surface<'_>, palette: &Palette, header: &str, clock: Option<&str>) {
    surface.put(0, 0, header, palette.emphasis());

    if let Some(clock) = clock {
        let len = text_width(clock) as i32;
        let col = i32::from(surface.width()) / 2 - len / 2 - len % 2;
        surface.put(col.max(0) as u16, 0, clock, palette.default);
    }
}

/// `─── Title ─────────` across the full width
fn section_title(surface: &mut Surface<'_>, palette: &Palette, title: &str, row: i32) {
    let Ok(row) = u16::try_from(row) else {
        return;
    };
    let width = i32::from(surface.width());
    let after = TITLE_COLUMN + text_width(title) as i32 + 1;

    surface.hline(0, row, (TITLE_COLUMN - 1) as u16, palette.default);
    surface.put(TITLE_COLUMN as u16, row, title, palette.emphasis());
    if after < width {
        surface.hline(after as u16, row, (width - after) as u16, palette.default);
    }
}

fn put_row(surface: &mut Surface<'_>, col: u16, row: i32, text: &str, palette: &Palette) {
    if let Ok(row) = u16::try_from(row) {
        surface.put(col, row, text, palette.default);
    }
}
