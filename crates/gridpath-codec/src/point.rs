//! A single grid cell coordinate.

use std::fmt;

use crate::error::CodecError;
use crate::wire::{read_i32_le, write_i32_le};

/// A grid cell coordinate.
///
/// The type enforces no bounds; keeping a point inside a grid's
/// `width x height` is the caller's job. See [`in_grid`](Point::in_grid).
///
/// Wire layout: `x: i32 LE` then `y: i32 LE`, 8 bytes, no padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: u32 = 8;

    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this point addresses a cell of a `width x height` grid.
    pub fn in_grid(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }

    /// Manhattan distance to `other`, saturating at `u32::MAX`.
    pub fn manhattan(self, other: Point) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Write this point at `at`.
    pub fn encode(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError> {
        crate::wire::check_region(buf.len(), at, Self::WIRE_SIZE as u64)?;
        write_i32_le(buf, at, self.x)?;
        write_i32_le(buf, at + 4, self.y)
    }

    /// Read a point from `at`.
    pub fn decode(buf: &[u8], at: u32) -> Result<Self, CodecError> {
        crate::wire::check_region(buf.len(), at, Self::WIRE_SIZE as u64)?;
        Ok(Self {
            x: read_i32_le(buf, at)?,
            y: read_i32_le(buf, at + 4)?,
        })
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
