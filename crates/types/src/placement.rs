//! Screen placement of dashboard items
//!
//! An item declares where it wants to be either as a fraction of the screen
//! (`prop`) or as an exact cell (`int`), plus a horizontal alignment and cell
//! offsets. [`Placement::resolve`] turns that into an absolute cell.

use serde::{Deserialize, Serialize};

/// How `x`/`y` translate into terminal cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSystem {
    /// Fractions of the screen, `(0, 0)` top left, `(1, 1)` bottom right
    #[default]
    Prop,
    /// Exact column and row
    Int,
}

/// Horizontal alignment relative to the anchor column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Declared position of an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub coords: CoordSystem,
    #[serde(default)]
    pub halign: HAlign,
    /// Columns added after alignment
    #[serde(default)]
    pub xoffset: i32,
    /// Rows added after alignment
    #[serde(default)]
    pub yoffset: i32,
}

impl Placement {
    /// Proportional placement
    pub fn prop(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            coords: CoordSystem::Prop,
            halign: HAlign::Left,
            xoffset: 0,
            yoffset: 0,
        }
    }

    /// Exact cell placement
    pub fn cell(col: u16, row: u16) -> Self {
        Self {
            x: f64::from(col),
            y: f64::from(row),
            coords: CoordSystem::Int,
            ..Self::prop(0.0, 0.0)
        }
    }

    pub fn align(mut self, halign: HAlign) -> Self {
        self.halign = halign;
        self
    }

    pub fn offset(mut self, xoffset: i32, yoffset: i32) -> Self {
        self.xoffset = xoffset;
        self.yoffset = yoffset;
        self
    }

    /// Absolute `(column, row)` for text of `text_len` cells on a
    /// `width` x `height` surface. Never negative.
    pub fn resolve(&self, width: u16, height: u16, text_len: usize) -> (u16, u16) {
        let (mut col, mut row) = match self.coords {
            CoordSystem::Int => (self.x as i64, self.y as i64),
            CoordSystem::Prop => (
                (self.x * f64::from(width)) as i64,
                (self.y * f64::from(height)) as i64,
            ),
        };

        let len = text_len as i64;
        match self.halign {
            HAlign::Left => {}
            HAlign::Center => col -= len / 2,
            HAlign::Right => col -= len - 1,
        }

        col += i64::from(self.xoffset);
        row += i64::from(self.yoffset);

        (clamp_cell(col), clamp_cell(row))
    }
}

fn clamp_cell(v: i64) -> u16 {
    v.clamp(0, i64::from(u16::MAX)) as u16
}
