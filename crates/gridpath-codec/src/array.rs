//! Variable-length point arrays and their 12-byte header.

use std::ops::Range;

use crate::error::CodecError;
use crate::point::Point;
use crate::wire::{check_region, read_u32_le, write_u32_le};

/// The 12-byte header that precedes every encoded [`PointArray`].
///
/// Exposed on its own so callers can inspect what the other side claims
/// before trusting the body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Address of the first point record.
    pub items_offset: u32,
    /// Number of valid records.
    pub count: u32,
    /// Number of reserved record slots.
    pub capacity: u32,
}

impl ArrayHeader {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: u32 = 12;

    /// Read a header from `at`.
    pub fn read(buf: &[u8], at: u32) -> Result<Self, CodecError> {
        check_region(buf.len(), at, Self::WIRE_SIZE as u64)?;
        Ok(Self {
            items_offset: read_u32_le(buf, at)?,
            count: read_u32_le(buf, at + 4)?,
            capacity: read_u32_le(buf, at + 8)?,
        })
    }

    /// Write this header at `at`.
    pub fn write(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError> {
        check_region(buf.len(), at, Self::WIRE_SIZE as u64)?;
        write_u32_le(buf, at, self.items_offset)?;
        write_u32_le(buf, at + 4, self.count)?;
        write_u32_le(buf, at + 8, self.capacity)
    }

    /// Check that the header is self-consistent and that `count` records at
    /// `items_offset` fit inside a buffer of `buf_len` bytes.
    pub fn validate(&self, buf_len: usize) -> Result<(), CodecError> {
        if self.count > self.capacity {
            return Err(CodecError::CountExceedsCapacity {
                count: self.count,
                capacity: self.capacity,
            });
        }
        let body = self.count as u64 * Point::WIRE_SIZE as u64;
        if self.items_offset as u64 + body > buf_len as u64 {
            return Err(CodecError::ItemsOutOfBounds {
                items_offset: self.items_offset,
                count: self.count,
                buffer_len: buf_len,
            });
        }
        Ok(())
    }

    /// Check that the `count` records at `items_offset` lie inside `region`.
    ///
    /// An empty body is inside any region.
    pub fn check_within(&self, region: Range<u32>) -> Result<(), CodecError> {
        if self.count == 0 {
            return Ok(());
        }
        let end = self.items_offset as u64 + self.count as u64 * Point::WIRE_SIZE as u64;
        if self.items_offset < region.start || end > region.end as u64 {
            return Err(CodecError::ItemsOutsideRegion {
                items_offset: self.items_offset,
                count: self.count,
                region_start: region.start,
                region_end: region.end,
            });
        }
        Ok(())
    }
}

/// An ordered run of points with reserved spare capacity.
///
/// `count` is always `items.len()`; `capacity >= count` is the number of
/// slots the encoded body reserves. Slots past `count` are never written by
/// [`encode`](PointArray::encode) and never read by
/// [`decode`](PointArray::decode).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointArray {
    items: Vec<Point>,
    capacity: u32,
}

impl PointArray {
    /// Size of the header in bytes.
    pub const HEADER_SIZE: u32 = ArrayHeader::WIRE_SIZE;

    /// An array whose capacity equals its length.
    pub fn new(items: Vec<Point>) -> Self {
        let capacity = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Self { items, capacity }
    }

    /// An empty array reserving `capacity` slots, e.g. an output buffer.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// An array with explicit spare capacity.
    ///
    /// Returns `Err(CodecError::CountExceedsCapacity)` if there are more
    /// items than slots.
    pub fn from_parts(items: Vec<Point>, capacity: u32) -> Result<Self, CodecError> {
        match u32::try_from(items.len()) {
            Ok(count) if count <= capacity => Ok(Self { items, capacity }),
            _ => Err(CodecError::CountExceedsCapacity {
                count: u32::try_from(items.len()).unwrap_or(u32::MAX),
                capacity,
            }),
        }
    }

    /// Number of valid items.
    pub fn count(&self) -> u32 {
        u32::try_from(self.items.len()).unwrap_or(u32::MAX)
    }

    /// Number of valid items, as a `usize`.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no valid items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of reserved slots.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The valid items, in order.
    pub fn items(&self) -> &[Point] {
        &self.items
    }

    /// Iterate the valid items.
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.items.iter()
    }

    /// Take the items out.
    pub fn into_items(self) -> Vec<Point> {
        self.items
    }

    /// Header plus a body of `capacity` slots, in bytes.
    pub fn wire_size(&self) -> Result<u32, CodecError> {
        Self::wire_size_for(self.capacity)
    }

    /// Wire size of an array reserving `capacity` slots.
    pub fn wire_size_for(capacity: u32) -> Result<u32, CodecError> {
        capacity
            .checked_mul(Point::WIRE_SIZE)
            .and_then(|body| body.checked_add(Self::HEADER_SIZE))
            .ok_or(CodecError::TooLarge { capacity })
    }

    /// Write the header at `at` and the items right after it.
    ///
    /// The whole `[at, at + wire_size)` region must be inside `buf`; nothing
    /// is written otherwise.
    pub fn encode(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError> {
        let size = self.wire_size()?;
        check_region(buf.len(), at, size as u64)?;
        let count = u32::try_from(self.items.len()).map_err(|_| CodecError::TooLarge {
            capacity: self.capacity,
        })?;
        if count > self.capacity {
            return Err(CodecError::CountExceedsCapacity {
                count,
                capacity: self.capacity,
            });
        }

        let items_offset = at + Self::HEADER_SIZE;
        for (i, point) in self.items.iter().enumerate() {
            point.encode(buf, items_offset + i as u32 * Point::WIRE_SIZE)?;
        }
        ArrayHeader {
            items_offset,
            count,
            capacity: self.capacity,
        }
        .write(buf, at)
    }

    /// Read an array back from `at`.
    ///
    /// Exactly `count` records are read from `items_offset`. Headers with
    /// `count > capacity` or a body that leaves the buffer are rejected.
    pub fn decode(buf: &[u8], at: u32) -> Result<Self, CodecError> {
        Self::decode_with_limit(buf, at, u32::MAX)
    }

    /// Like [`decode`](PointArray::decode), but also rejects arrays holding
    /// more than `limit` items.
    pub fn decode_with_limit(buf: &[u8], at: u32, limit: u32) -> Result<Self, CodecError> {
        let header = Self::checked_header(buf, at, limit)?;
        Self::read_body(buf, &header)
    }

    /// Like [`decode_with_limit`](PointArray::decode_with_limit), but the
    /// body must also lie inside `region`.
    ///
    /// Use this when the header was written by the other side of the
    /// boundary and only part of the buffer holds data it may point at.
    pub fn decode_within(
        buf: &[u8],
        at: u32,
        limit: u32,
        region: Range<u32>,
    ) -> Result<Self, CodecError> {
        let header = Self::checked_header(buf, at, limit)?;
        header.check_within(region)?;
        Self::read_body(buf, &header)
    }

    fn checked_header(buf: &[u8], at: u32, limit: u32) -> Result<ArrayHeader, CodecError> {
        let header = ArrayHeader::read(buf, at)?;
        header.validate(buf.len())?;
        if header.count > limit {
            return Err(CodecError::CountExceedsLimit {
                count: header.count,
                limit,
            });
        }
        Ok(header)
    }

    fn read_body(buf: &[u8], header: &ArrayHeader) -> Result<Self, CodecError> {
        let mut items = Vec::with_capacity(header.count as usize);
        for i in 0..header.count {
            items.push(Point::decode(
                buf,
                header.items_offset + i * Point::WIRE_SIZE,
            )?);
        }
        Ok(Self {
            items,
            capacity: header.capacity,
        })
    }
}

impl FromIterator<Point> for PointArray {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for PointArray {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointArray {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
