//! Byte-exact wire layouts for grid points and point arrays.
//!
//! The layouts match what C code compiled for a 32-bit little-endian target
//! expects for these structs:
//!
//! ```text
//! struct position       { int x; int y; }                     // 8 bytes
//! struct position_array { position *items; int count; int capacity; }
//!                                                             // 12-byte header
//! ```
//!
//! An encoded [`PointArray`] is its header immediately followed by a body of
//! `capacity` point slots:
//!
//! ```text
//! [items_offset u32][count u32][capacity u32][Point 0]...[Point capacity-1]
//! ```
//!
//! All integers are little-endian. There is no padding and no type metadata;
//! the module on the other side reads the buffer by raw offset arithmetic.
//!
//! # Entry points
//!
//! - [`Point`] and [`PointArray`] encode and decode at explicit offsets.
//! - [`place`] reserves a value's exact wire size in an [`Arena`] and
//!   encodes it there in one step; [`fetch`] is its inverse.
//!
//! [`Arena`]: gridpath_arena::Arena

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod error;
pub mod place;
pub mod point;
pub mod wire;

pub use array::{ArrayHeader, PointArray};
pub use error::CodecError;
pub use place::{fetch, place, Wire};
pub use point::Point;
