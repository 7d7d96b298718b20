//! gridpath: pass grid points across a shared-memory boundary to a
//! separately compiled pathfinding module.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all gridpath sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use gridpath::prelude::*;
//!
//! // A module that "finds" a path by jumping straight from start to end.
//! struct Teleport;
//! impl PathfindModule for Teleport {
//!     fn name(&self) -> &str { "teleport" }
//!     fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
//!         let mem = imports.memory();
//!         let start = Point::decode(mem, args.start).unwrap();
//!         let end = Point::decode(mem, args.end).unwrap();
//!         let mut out = ArrayHeader::read(mem, args.output).unwrap();
//!
//!         let mem = imports.memory_mut();
//!         start.encode(mem, out.items_offset).unwrap();
//!         end.encode(mem, out.items_offset + Point::WIRE_SIZE).unwrap();
//!         out.count = 2;
//!         out.write(mem, args.output).unwrap();
//!         2
//!     }
//! }
//!
//! let mut host = Host::new(HostConfig::default()).unwrap();
//! let mut bound = host.bind(Teleport).unwrap();
//!
//! let obstacles: PointArray = [Point::new(1, 1)].into_iter().collect();
//! let request = PathRequest::new(obstacles, 4, 4, Point::new(0, 0), Point::new(3, 3));
//! let outcome = bound.pathfind(&request).unwrap();
//! assert_eq!(
//!     outcome.path().unwrap().items(),
//!     &[Point::new(0, 0), Point::new(3, 3)]
//! );
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `gridpath-arena` | Epoch-reset bump arena, `Offset` handles, linear memory |
//! | [`codec`] | `gridpath-codec` | C-layout `Point` and `PointArray` encode/decode |
//! | [`host`] | `gridpath-host` | Host context, module seam, import table, config |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Epoch-reset bump arena over shared linear memory (`gridpath-arena`).
///
/// Most users only interact with the arena through [`host::Host`].
pub use gridpath_arena as arena;

/// Byte-exact wire layouts for points and point arrays (`gridpath-codec`).
///
/// [`codec::place`] and [`codec::fetch`] combine allocation with
/// encoding and decoding.
pub use gridpath_codec as codec;

/// Host context and module boundary (`gridpath-host`).
///
/// [`host::Host`] owns the memory; [`host::PathfindModule`] is the
/// extension point for whatever runs on the other side.
pub use gridpath_host as host;

/// Common imports for typical gridpath usage.
///
/// ```rust
/// use gridpath::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use gridpath_arena::{Arena, ArenaError, LinearMemory, Offset};

    // Codec
    pub use gridpath_codec::{ArrayHeader, CodecError, Point, PointArray};

    // Host
    pub use gridpath_host::{
        Bound, Host, HostConfig, HostError, HostImports, OutputCapacity, PathOutcome,
        PathRequest, PathfindModule, PathfindStatus, RawArgs, StatusPolicy,
    };
}
