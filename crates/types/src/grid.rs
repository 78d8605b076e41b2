//! Navigable grid coordinates
//!
//! Navigable items sit on a 2-D grid that is independent of their screen
//! position. The cursor walks this grid with the arrow keys.

use serde::{Deserialize, Serialize};

/// A cell on the navigable grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Move one cell in `direction`.
    ///
    /// With `cycle` the walk is modulo `max + 1` on the moved axis. Without
    /// it, moving towards zero stops at zero and moving away stops at the
    /// maximum.
    pub fn step(self, direction: Direction, bounds: GridBounds, cycle: bool) -> Self {
        let (coord, max, forward) = match direction {
            Direction::Up => (self.y, bounds.max_y, false),
            Direction::Down => (self.y, bounds.max_y, true),
            Direction::Left => (self.x, bounds.max_x, false),
            Direction::Right => (self.x, bounds.max_x, true),
        };

        let moved = if cycle {
            let span = i64::from(max) + 1;
            let delta = if forward { 1 } else { -1 };
            (i64::from(coord) + delta).rem_euclid(span) as u32
        } else if forward {
            if coord < max {
                coord + 1
            } else {
                coord
            }
        } else {
            coord.saturating_sub(1)
        };

        match direction {
            Direction::Up | Direction::Down => Self { y: moved, ..self },
            Direction::Left | Direction::Right => Self { x: moved, ..self },
        }
    }
}

impl From<(u32, u32)> for GridPos {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Largest grid coordinates among navigable items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridBounds {
    pub max_x: u32,
    pub max_y: u32,
}

impl GridBounds {
    /// Compute bounds from a set of positions. `None` when the set is empty.
    pub fn from_positions<I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = GridPos>,
    {
        positions.into_iter().fold(None, |acc, pos| {
            Some(match acc {
                None => GridBounds {
                    max_x: pos.x,
                    max_y: pos.y,
                },
                Some(b) => GridBounds {
                    max_x: b.max_x.max(pos.x),
                    max_y: b.max_y.max(pos.y),
                },
            })
        })
    }
}

/// Arrow-key direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}
