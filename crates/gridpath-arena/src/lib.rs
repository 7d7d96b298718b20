//! Epoch-reset bump arena over a shared linear memory buffer.
//!
//! The arena hands out byte ranges inside a fixed-capacity buffer that is
//! shared with a separately compiled module. Nothing is freed individually:
//! the whole dynamic region is wiped and rewound by [`Arena::reset`], which
//! also starts a new epoch.
//!
//! # Architecture
//!
//! ```text
//! LinearMemory (or any AsRef<[u8]> + AsMut<[u8]>)
//! ├── [0, base)         static region, owned by the module
//! └── [base, capacity)  dynamic region, bump-allocated by Arena
//!     ├── [base, cursor)       live allocations of the current epoch
//!     └── [cursor, capacity)   free
//! ```
//!
//! Host-side callers receive [`Offset`] handles tagged with the arena's
//! [`ArenaId`] and the epoch they were allocated in. The raw `u32` address
//! only leaves the arena through [`Arena::resolve`], which rejects handles
//! from another arena or an earlier epoch.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod error;
pub mod handle;
pub mod memory;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use error::ArenaError;
pub use handle::{ArenaId, Offset};
pub use memory::LinearMemory;
