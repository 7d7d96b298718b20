//! Error types for the host side of the boundary.
//!
//! Allocation and decode failures are invariant violations and abort the
//! current invocation. A module reporting "no path" is not an error; it is
//! returned as [`PathOutcome::NotFound`](crate::PathOutcome::NotFound).

use std::error::Error;
use std::fmt;

use gridpath_arena::ArenaError;
use gridpath_codec::{CodecError, Point};

use crate::config::ConfigError;

/// Errors from constructing a host or running an invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// The host configuration is invalid.
    Config(ConfigError),
    /// The host could not reserve space for its own arguments.
    Arena(ArenaError),
    /// An argument could not be encoded or the result could not be decoded.
    Codec(CodecError),
    /// The module asked for more memory than the arena had left.
    ImportFault(ArenaError),
    /// The module called its `terminate` import.
    ModuleTerminated {
        /// The exit code the module reported.
        code: i32,
    },
    /// The module's static data reaches past the arena base.
    HeapOverlap {
        /// First byte past the module's static data.
        module_heap_base: u32,
        /// Start of the arena's dynamic region.
        arena_base: u32,
    },
    /// The grid has a zero or unrepresentable dimension.
    InvalidGrid {
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
    /// A start or end point lies outside the grid.
    PointOutsideGrid {
        /// The offending point.
        point: Point,
        /// Grid width in cells.
        width: u32,
        /// Grid height in cells.
        height: u32,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid host config: {e}"),
            Self::Arena(e) => write!(f, "argument allocation failed: {e}"),
            Self::Codec(e) => write!(f, "codec error: {e}"),
            Self::ImportFault(e) => write!(f, "module allocation failed: {e}"),
            Self::ModuleTerminated { code } => write!(f, "module terminated with code {code}"),
            Self::HeapOverlap {
                module_heap_base,
                arena_base,
            } => write!(
                f,
                "module static data ends at {module_heap_base}, past arena base {arena_base}"
            ),
            Self::InvalidGrid { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::PointOutsideGrid {
                point,
                width,
                height,
            } => write!(f, "point {point} outside {width}x{height} grid"),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Arena(e) | Self::ImportFault(e) => Some(e),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for HostError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ArenaError> for HostError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<CodecError> for HostError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Arena(inner) => Self::Arena(inner),
            other => Self::Codec(other),
        }
    }
}
