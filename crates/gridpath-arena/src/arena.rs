//! The bump arena.
//!
//! [`Arena`] serves monotonically increasing allocations from a cursor that
//! starts at `base`. It never reclaims a single allocation; [`Arena::reset`]
//! wipes the whole dynamic region, rewinds the cursor, and starts a new
//! epoch. The buffer itself is generic so the arena can own its memory
//! ([`LinearMemory`](crate::LinearMemory)) or borrow someone else's
//! (`&mut [u8]`).

use crate::error::ArenaError;
use crate::handle::{ArenaId, Offset};

/// Bump allocator over a shared byte buffer.
///
/// Invariant: `base <= cursor <= capacity`. Every successful allocation
/// returns an address `p >= base` and reserves `[p, p + size)` until the
/// next [`reset`](Arena::reset).
pub struct Arena<M> {
    memory: M,
    id: ArenaId,
    /// Start of the dynamic region. Fixed at construction.
    base: u32,
    /// Bump pointer: next free byte.
    cursor: u32,
    /// Incremented on every reset.
    epoch: u64,
}

impl<M: AsRef<[u8]> + AsMut<[u8]>> Arena<M> {
    /// Create an arena whose dynamic region starts at `base`.
    ///
    /// Returns `Err(ArenaError::InvalidBase)` if `base` lies past the end of
    /// the buffer, or `Err(ArenaError::BufferTooLarge)` if the buffer cannot
    /// be addressed with 32-bit offsets.
    pub fn new(memory: M, base: u32) -> Result<Self, ArenaError> {
        let capacity = memory.as_ref().len();
        if u32::try_from(capacity).is_err() {
            return Err(ArenaError::BufferTooLarge { capacity });
        }
        if base as usize > capacity {
            return Err(ArenaError::InvalidBase { base, capacity });
        }
        Ok(Self {
            memory,
            id: ArenaId::next(),
            base,
            cursor: base,
            epoch: 0,
        })
    }

    /// Reserve `size` bytes at the cursor.
    ///
    /// The cursor is left untouched when the request does not fit.
    pub fn allocate(&mut self, size: u32) -> Result<Offset, ArenaError> {
        let addr = self.allocate_raw(size)?;
        Ok(self.tag(addr))
    }

    /// Allocate `new_size` fresh bytes and copy `min(old_size, new_size)`
    /// bytes from `old` into them. The old region stays reserved.
    pub fn reallocate(
        &mut self,
        old: Offset,
        old_size: u32,
        new_size: u32,
    ) -> Result<Offset, ArenaError> {
        let old_addr = self.resolve(old)?;
        let addr = self.reallocate_raw(old_addr, old_size, new_size)?;
        Ok(self.tag(addr))
    }

    /// Individual allocations are never reclaimed; use [`reset`](Arena::reset).
    pub fn release(&mut self, _offset: Offset) {}

    /// Zero `[base, cursor)`, rewind the cursor to `base` and start a new epoch.
    ///
    /// Every [`Offset`] issued before the reset becomes stale.
    pub fn reset(&mut self) {
        let (base, cursor) = (self.base as usize, self.cursor as usize);
        self.memory.as_mut()[base..cursor].fill(0);
        tracing::debug!(
            arena = %self.id,
            epoch = self.epoch,
            reclaimed = cursor - base,
            "arena reset"
        );
        self.cursor = self.base;
        self.epoch += 1;
    }

    /// Check that `offset` belongs to this arena and the current epoch, and
    /// return its raw address.
    pub fn resolve(&self, offset: Offset) -> Result<u32, ArenaError> {
        if offset.arena != self.id {
            return Err(ArenaError::ForeignOffset {
                expected: self.id,
                found: offset.arena,
            });
        }
        if offset.epoch != self.epoch {
            return Err(ArenaError::StaleOffset {
                offset_epoch: offset.epoch,
                current_epoch: self.epoch,
            });
        }
        Ok(offset.addr)
    }

    /// Raw-address form of [`allocate`](Arena::allocate), for requests that
    /// arrive from the module side of the boundary.
    pub fn allocate_raw(&mut self, size: u32) -> Result<u32, ArenaError> {
        let remaining = self.remaining();
        if size > remaining {
            return Err(ArenaError::CapacityExceeded {
                requested: size,
                remaining,
            });
        }
        let addr = self.cursor;
        self.cursor += size;
        tracing::trace!(arena = %self.id, addr, size, "allocate");
        Ok(addr)
    }

    /// Raw-address form of [`reallocate`](Arena::reallocate).
    ///
    /// The source range `[old, old + old_size)` must lie inside the buffer.
    pub fn reallocate_raw(
        &mut self,
        old: u32,
        old_size: u32,
        new_size: u32,
    ) -> Result<u32, ArenaError> {
        let capacity = self.memory.as_ref().len();
        let copy = old_size.min(new_size);
        let in_bounds = (old as u64) + (copy as u64) <= capacity as u64;
        if !in_bounds {
            return Err(ArenaError::OutOfBounds {
                offset: old,
                len: copy,
                capacity,
            });
        }
        let addr = self.allocate_raw(new_size)?;
        let src = old as usize..(old + copy) as usize;
        self.memory.as_mut().copy_within(src, addr as usize);
        Ok(addr)
    }

    fn tag(&self, addr: u32) -> Offset {
        Offset::new(self.id, self.epoch, addr)
    }
}

impl<M: AsRef<[u8]>> Arena<M> {
    /// This arena's unique id.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// Start of the dynamic region.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Current allocation frontier.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Number of resets performed so far (wrapping).
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Bytes allocated in the current epoch.
    pub fn used(&self) -> u32 {
        self.cursor - self.base
    }

    /// Bytes still available before the end of the buffer.
    pub fn remaining(&self) -> u32 {
        self.capacity() - self.cursor
    }

    /// Total buffer size in bytes.
    pub fn capacity(&self) -> u32 {
        // Checked to fit in `new`.
        self.memory.as_ref().len() as u32
    }

    /// Shared view of the whole buffer.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_ref()
    }

    /// Consume the arena and hand the buffer back.
    pub fn into_memory(self) -> M {
        self.memory
    }
}

impl<M: AsMut<[u8]>> Arena<M> {
    /// Mutable view of the whole buffer.
    pub fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.as_mut()
    }
}
