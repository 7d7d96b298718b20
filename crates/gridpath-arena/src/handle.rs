//! Arena identities and epoch-tagged offsets.
//!
//! An [`Offset`] records which arena issued it and in which epoch. The
//! `epoch` field allows O(1) staleness checks after a [`reset`], and the
//! arena id catches offsets accidentally carried between buffers.
//!
//! [`reset`]: crate::Arena::reset

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
///
/// The only process-wide state in the workspace. It only hands out ids, so
/// arenas stay independent of each other.
static ARENA_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an [`Arena`](crate::Arena).
///
/// Allocated from a monotonic atomic counter. Two arenas never share an id,
/// even when they wrap the same buffer one after the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena id.
    pub fn next() -> Self {
        Self(ARENA_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an allocation inside an arena's buffer.
///
/// Offsets are only meaningful for the arena and epoch that produced them.
/// The raw address is available through [`addr`](Offset::addr) for logging,
/// but anything crossing the module boundary should go through
/// [`Arena::resolve`](crate::Arena::resolve) so stale handles are caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Offset {
    pub(crate) arena: ArenaId,
    pub(crate) epoch: u64,
    pub(crate) addr: u32,
}

impl Offset {
    pub(crate) fn new(arena: ArenaId, epoch: u64, addr: u32) -> Self {
        Self { arena, epoch, addr }
    }

    /// The arena that issued this offset.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// The epoch this offset was allocated in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Raw byte address inside the buffer, unchecked.
    pub fn addr(&self) -> u32 {
        self.addr
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Offset(arena={}, epoch={}, addr={})",
            self.arena, self.epoch, self.addr
        )
    }
}
