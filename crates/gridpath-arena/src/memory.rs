//! Fixed-capacity linear memory sized in 64 KiB pages.

use crate::error::ArenaError;

/// A zero-initialised, fixed-capacity byte buffer.
///
/// Mirrors a module's linear memory: it is sized once, in whole pages, and
/// never grows. Every address inside it fits in a `u32`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearMemory {
    bytes: Box<[u8]>,
}

impl LinearMemory {
    /// Size of one page in bytes.
    pub const PAGE_SIZE: u32 = 65_536;

    /// Largest page count whose byte size still fits in a `u32`.
    pub const MAX_PAGES: u32 = 65_535;

    /// Allocate `pages` zeroed pages.
    ///
    /// Returns `Err(ArenaError::BufferTooLarge)` if the total size would not
    /// be addressable with 32-bit offsets.
    pub fn with_pages(pages: u32) -> Result<Self, ArenaError> {
        if pages > Self::MAX_PAGES {
            return Err(ArenaError::BufferTooLarge {
                capacity: pages as usize * Self::PAGE_SIZE as usize,
            });
        }
        let len = pages as usize * Self::PAGE_SIZE as usize;
        Ok(Self {
            bytes: vec![0u8; len].into_boxed_slice(),
        })
    }

    /// Wrap an existing byte vector.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ArenaError> {
        if u32::try_from(bytes.len()).is_err() {
            return Err(ArenaError::BufferTooLarge {
                capacity: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Total size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the memory has zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of whole pages.
    pub fn pages(&self) -> u32 {
        (self.bytes.len() / Self::PAGE_SIZE as usize) as u32
    }
}

impl AsRef<[u8]> for LinearMemory {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for LinearMemory {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_zeroed() {
        let mem = LinearMemory::with_pages(2).unwrap();
        assert_eq!(mem.len(), 2 * 65_536);
        assert_eq!(mem.pages(), 2);
        assert!(mem.as_ref().iter().all(|&b| b == 0));
    }

    #[test]
    fn too_many_pages_rejected() {
        let err = LinearMemory::with_pages(LinearMemory::MAX_PAGES + 1).unwrap_err();
        assert!(matches!(err, ArenaError::BufferTooLarge { .. }));
    }

    #[test]
    fn from_bytes_keeps_contents() {
        let mem = LinearMemory::from_bytes(vec![1, 2, 3]).unwrap();
        assert_eq!(mem.as_ref(), &[1, 2, 3]);
        assert_eq!(mem.pages(), 0);
        assert!(!mem.is_empty());
    }
}
