//! Well-known result codes returned across the module boundary.
//!
//! The boundary call returns a bare `i32`. Success values are owned by the
//! module (usually the path length); [`PathfindStatus`] names the negative
//! failure codes that modules built against this host agree on.

use std::fmt;

/// Failure code returned by `pathfind`.
///
/// All codes are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathfindStatus {
    /// The end point is unreachable from the start point.
    NoPath = -1,
    /// An argument was out of range (zero-sized grid, point off the grid,
    /// malformed obstacle array).
    InvalidArgument = -2,
    /// An `allocate` or `reallocate` import returned NULL.
    AllocationFailed = -3,
}

impl PathfindStatus {
    /// Map a raw result back to a known code.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::NoPath),
            -2 => Some(Self::InvalidArgument),
            -3 => Some(Self::AllocationFailed),
            _ => None,
        }
    }

    /// The raw code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for PathfindStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPath => write!(f, "no path"),
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::AllocationFailed => write!(f, "allocation failed"),
        }
    }
}
