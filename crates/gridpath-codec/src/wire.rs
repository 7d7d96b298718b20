//! Bounds-checked little-endian primitives over byte slices.

use crate::error::CodecError;

fn range(buf_len: usize, at: u32, len: u32) -> Result<std::ops::Range<usize>, CodecError> {
    let end = at as u64 + len as u64;
    if end > buf_len as u64 {
        return Err(CodecError::OutOfBounds {
            offset: at,
            len: len as u64,
            buffer_len: buf_len,
        });
    }
    Ok(at as usize..end as usize)
}

/// Check that `[at, at + len)` lies inside a buffer of `buf_len` bytes.
pub fn check_region(buf_len: usize, at: u32, len: u64) -> Result<(), CodecError> {
    if at as u64 + len > buf_len as u64 {
        return Err(CodecError::OutOfBounds {
            offset: at,
            len,
            buffer_len: buf_len,
        });
    }
    Ok(())
}

// ── Writers ─────────────────────────────────────────────────────

/// Write a little-endian u32 at `at`.
pub fn write_u32_le(buf: &mut [u8], at: u32, v: u32) -> Result<(), CodecError> {
    let r = range(buf.len(), at, 4)?;
    buf[r].copy_from_slice(&v.to_le_bytes());
    Ok(())
}

/// Write a little-endian i32 at `at`.
pub fn write_i32_le(buf: &mut [u8], at: u32, v: i32) -> Result<(), CodecError> {
    let r = range(buf.len(), at, 4)?;
    buf[r].copy_from_slice(&v.to_le_bytes());
    Ok(())
}

// ── Readers ─────────────────────────────────────────────────────

/// Read a little-endian u32 at `at`.
pub fn read_u32_le(buf: &[u8], at: u32) -> Result<u32, CodecError> {
    let r = range(buf.len(), at, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[r]);
    Ok(u32::from_le_bytes(bytes))
}

/// Read a little-endian i32 at `at`.
pub fn read_i32_le(buf: &[u8], at: u32) -> Result<i32, CodecError> {
    let r = range(buf.len(), at, 4)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[r]);
    Ok(i32::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_is_little_endian() {
        let mut buf = [0u8; 8];
        write_u32_le(&mut buf, 2, 0x0403_0201).unwrap();
        assert_eq!(buf, [0, 0, 1, 2, 3, 4, 0, 0]);
        assert_eq!(read_u32_le(&buf, 2).unwrap(), 0x0403_0201);
    }

    #[test]
    fn negative_i32_two_complement() {
        let mut buf = [0u8; 4];
        write_i32_le(&mut buf, 0, -3).unwrap();
        assert_eq!(buf, [0xFD, 0xFF, 0xFF, 0xFF]);
        assert_eq!(read_i32_le(&buf, 0).unwrap(), -3);
    }

    #[test]
    fn write_past_end_is_rejected() {
        let mut buf = [0u8; 6];
        let err = write_u32_le(&mut buf, 3, 1).unwrap_err();
        assert_eq!(
            err,
            CodecError::OutOfBounds {
                offset: 3,
                len: 4,
                buffer_len: 6
            }
        );
        assert_eq!(buf, [0u8; 6], "nothing written on failure");
    }

    #[test]
    fn read_near_u32_max_does_not_overflow() {
        let buf = [0u8; 4];
        assert!(read_i32_le(&buf, u32::MAX - 1).is_err());
    }

    #[test]
    fn region_check() {
        assert!(check_region(16, 8, 8).is_ok());
        assert!(check_region(16, 8, 9).is_err());
    }
}
