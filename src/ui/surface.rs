//! Clipped text writes into a ratatui buffer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Character cells `text` occupies
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// The area items and chrome draw into
///
/// All coordinates are relative to the area. Writes that start outside it
/// are dropped and writes running past the right edge are cut off.
pub struct Surface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
}

impl<'a> Surface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self { buf, area }
    }

    pub fn width(&self) -> u16 {
        self.area.width
    }

    pub fn height(&self) -> u16 {
        self.area.height
    }

    /// Write `text` starting at `(col, row)`
    pub fn put(&mut self, col: u16, row: u16, text: &str, style: Style) {
        if col >= self.area.width || row >= self.area.height {
            return;
        }
        let room = usize::from(self.area.width - col);
        self.buf.set_stringn(
            self.area.x + col,
            self.area.y + row,
            text,
            room,
            style,
        );
    }

    /// Horizontal rule of `len` cells starting at `(col, row)`
    pub fn hline(&mut self, col: u16, row: u16, len: u16, style: Style) {
        if len == 0 {
            return;
        }
        let rule = "\u{2500}".repeat(usize::from(len));
        self.put(col, row, &rule, style);
    }

    /// Paint every cell of the area with `style`
    pub fn fill(&mut self, style: Style) {
        self.buf.set_style(self.area, style);
    }
}
