//! Error types for the wire codec.

use std::fmt;

use gridpath_arena::ArenaError;

/// Errors that can occur while encoding or decoding wire layouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// A read or write would run past the end of the buffer.
    OutOfBounds {
        /// Start of the access.
        offset: u32,
        /// Length of the access in bytes.
        len: u64,
        /// Total buffer size in bytes.
        buffer_len: usize,
    },
    /// A point array claims more valid items than slots.
    CountExceedsCapacity {
        /// The `count` field.
        count: u32,
        /// The `capacity` field.
        capacity: u32,
    },
    /// A point array's items do not fit in the buffer at `items_offset`.
    ItemsOutOfBounds {
        /// The `items_offset` field.
        items_offset: u32,
        /// The `count` field.
        count: u32,
        /// Total buffer size in bytes.
        buffer_len: usize,
    },
    /// A point array's items lie outside the region the caller trusts.
    ItemsOutsideRegion {
        /// The `items_offset` field.
        items_offset: u32,
        /// The `count` field.
        count: u32,
        /// First byte of the trusted region.
        region_start: u32,
        /// One past the last byte of the trusted region.
        region_end: u32,
    },
    /// A point array holds more items than the caller agreed to accept.
    CountExceedsLimit {
        /// The `count` field.
        count: u32,
        /// The agreed maximum.
        limit: u32,
    },
    /// A point array is too large for its size to fit in a `u32`.
    TooLarge {
        /// The requested capacity in points.
        capacity: u32,
    },
    /// The arena could not provide or resolve the backing region.
    Arena(ArenaError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                offset,
                len,
                buffer_len,
            } => write!(
                f,
                "access of {len} bytes at {offset} outside buffer of {buffer_len} bytes"
            ),
            Self::CountExceedsCapacity { count, capacity } => {
                write!(f, "point array count {count} exceeds capacity {capacity}")
            }
            Self::ItemsOutOfBounds {
                items_offset,
                count,
                buffer_len,
            } => write!(
                f,
                "{count} points at {items_offset} run past buffer of {buffer_len} bytes"
            ),
            Self::ItemsOutsideRegion {
                items_offset,
                count,
                region_start,
                region_end,
            } => write!(
                f,
                "{count} points at {items_offset} fall outside [{region_start}, {region_end})"
            ),
            Self::CountExceedsLimit { count, limit } => {
                write!(f, "point array count {count} exceeds agreed limit {limit}")
            }
            Self::TooLarge { capacity } => {
                write!(f, "point array capacity {capacity} is too large to encode")
            }
            Self::Arena(e) => write!(f, "arena error: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for CodecError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
