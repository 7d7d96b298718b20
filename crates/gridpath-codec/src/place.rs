//! Composed allocate-then-encode over an [`Arena`].
//!
//! [`place`] is what a call site uses for every argument it hands across the
//! boundary: it reserves exactly the value's wire size and encodes into the
//! reserved region, returning an epoch-tagged [`Offset`].

use gridpath_arena::{Arena, Offset};

use crate::array::PointArray;
use crate::error::CodecError;
use crate::point::Point;

/// A value with a fixed on-wire layout.
pub trait Wire: Sized {
    /// Number of bytes [`encode`](Wire::encode) needs at its offset.
    fn wire_size(&self) -> Result<u32, CodecError>;

    /// Write the value at `at`.
    fn encode(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError>;

    /// Read a value from `at`.
    fn decode(buf: &[u8], at: u32) -> Result<Self, CodecError>;
}

impl Wire for Point {
    fn wire_size(&self) -> Result<u32, CodecError> {
        Ok(Point::WIRE_SIZE)
    }

    fn encode(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError> {
        Point::encode(self, buf, at)
    }

    fn decode(buf: &[u8], at: u32) -> Result<Self, CodecError> {
        Point::decode(buf, at)
    }
}

impl Wire for PointArray {
    fn wire_size(&self) -> Result<u32, CodecError> {
        PointArray::wire_size(self)
    }

    fn encode(&self, buf: &mut [u8], at: u32) -> Result<(), CodecError> {
        PointArray::encode(self, buf, at)
    }

    fn decode(buf: &[u8], at: u32) -> Result<Self, CodecError> {
        PointArray::decode(buf, at)
    }
}

/// Reserve `value`'s wire size in `arena` and encode it there.
///
/// For a [`PointArray`] this reserves `12 + capacity * 8` bytes, so the
/// spare slots are owned by the array even though they stay unwritten.
pub fn place<T, M>(arena: &mut Arena<M>, value: &T) -> Result<Offset, CodecError>
where
    T: Wire,
    M: AsRef<[u8]> + AsMut<[u8]>,
{
    let size = value.wire_size()?;
    let offset = arena.allocate(size)?;
    value.encode(arena.memory_mut(), offset.addr())?;
    Ok(offset)
}

/// Decode a value from an offset issued by `arena` in its current epoch.
pub fn fetch<T, M>(arena: &Arena<M>, offset: Offset) -> Result<T, CodecError>
where
    T: Wire,
    M: AsRef<[u8]> + AsMut<[u8]>,
{
    let addr = arena.resolve(offset)?;
    T::decode(arena.memory(), addr)
}
