//! Host side of the gridpath module boundary.
//!
//! A [`Host`] owns one linear memory buffer shared with a separately
//! compiled pathfinding module, and a bump [`Arena`](gridpath_arena::Arena)
//! over its dynamic region. Each call to [`Bound::pathfind`] is one epoch:
//!
//! 1. **Reset** the arena; every offset from the previous call goes stale.
//! 2. **Stage** the request: encode obstacles, start and end, and reserve an
//!    empty output array sized by [`OutputCapacity`].
//! 3. **Invoke** the module with raw addresses. The module allocates
//!    scratch space through [`HostImports`], from the same arena.
//! 4. **Collect** the output array, if the [`StatusPolicy`] says the module
//!    succeeded.
//!
//! Module-side failures are reported through the integer result and end up
//! as [`PathOutcome::NotFound`]. Failures of the boundary itself (refused
//! allocations, undecodable output, `terminate`) are [`HostError`]s.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod imports;
pub mod module;
pub mod status;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, HostConfig, OutputCapacity, StatusPolicy};
pub use error::HostError;
pub use host::{Bound, Host, PathOutcome, PathRequest, StagedArgs};
pub use imports::{ArenaImports, ImportReport};
pub use module::{HostImports, PathfindModule, RawArgs};
pub use status::PathfindStatus;
