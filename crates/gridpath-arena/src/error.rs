//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::handle::ArenaId;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request does not fit in the remaining buffer space.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: u32,
        /// Bytes left between the cursor and the end of the buffer.
        remaining: u32,
    },
    /// An [`Offset`](crate::Offset) from an epoch that has been reset away.
    StaleOffset {
        /// The epoch encoded in the offset.
        offset_epoch: u64,
        /// The arena's current epoch.
        current_epoch: u64,
    },
    /// An [`Offset`](crate::Offset) that was issued by a different arena.
    ForeignOffset {
        /// The arena the offset was resolved against.
        expected: ArenaId,
        /// The arena that issued the offset.
        found: ArenaId,
    },
    /// A byte range that does not lie inside the buffer.
    OutOfBounds {
        /// Start of the range.
        offset: u32,
        /// Length of the range in bytes.
        len: u32,
        /// Total buffer size in bytes.
        capacity: usize,
    },
    /// The arena base lies past the end of the buffer.
    InvalidBase {
        /// The requested base offset.
        base: u32,
        /// Total buffer size in bytes.
        capacity: usize,
    },
    /// The buffer is too large to be addressed with 32-bit offsets.
    BufferTooLarge {
        /// Total buffer size in bytes.
        capacity: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::StaleOffset {
                offset_epoch,
                current_epoch,
            } => {
                write!(
                    f,
                    "stale offset: epoch {offset_epoch}, arena is at epoch {current_epoch}"
                )
            }
            Self::ForeignOffset { expected, found } => {
                write!(f, "offset from arena {found} used with arena {expected}")
            }
            Self::OutOfBounds {
                offset,
                len,
                capacity,
            } => {
                write!(
                    f,
                    "range [{offset}, {offset}+{len}) outside buffer of {capacity} bytes"
                )
            }
            Self::InvalidBase { base, capacity } => {
                write!(f, "arena base {base} beyond buffer of {capacity} bytes")
            }
            Self::BufferTooLarge { capacity } => {
                write!(
                    f,
                    "buffer of {capacity} bytes is not addressable with 32-bit offsets"
                )
            }
        }
    }
}

impl Error for ArenaError {}
