//! Host configuration, validation, and error types.
//!
//! [`HostConfig`] is the input to [`Host::new`](crate::Host::new).
//! [`validate()`](HostConfig::validate) checks structural invariants before
//! any memory is allocated.

use std::error::Error;
use std::fmt;

use gridpath_arena::LinearMemory;

// ── OutputCapacity ────────────────────────────────────────────────

/// How many point slots to reserve for the module's output array.
///
/// There is no renegotiation mid-call, so the reservation must cover the
/// longest result the module may produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputCapacity {
    /// `width * height` slots: a simple path in a 4-connected grid visits
    /// each cell at most once.
    #[default]
    GridArea,
    /// A fixed number of slots regardless of grid size.
    Fixed(u32),
}

impl OutputCapacity {
    /// Resolve the slot count for a `width x height` grid.
    ///
    /// Returns `None` if `width * height` overflows a `u32`.
    pub fn resolve(self, width: u32, height: u32) -> Option<u32> {
        match self {
            Self::GridArea => width.checked_mul(height),
            Self::Fixed(n) => Some(n),
        }
    }
}

// ── StatusPolicy ──────────────────────────────────────────────────

/// How the module's integer result maps onto found / not found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// `>= 0` means a path was written (the value is usually its length);
    /// negative values are failure codes.
    #[default]
    NonNegative,
    /// `0` means a path was written; anything else is a failure code.
    ZeroIsSuccess,
}

impl StatusPolicy {
    /// Whether `status` reports success under this policy.
    pub fn is_success(self, status: i32) -> bool {
        match self {
            Self::NonNegative => status >= 0,
            Self::ZeroIsSuccess => status == 0,
        }
    }
}

// ── HostConfig ────────────────────────────────────────────────────

/// Configuration for a [`Host`](crate::Host).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostConfig {
    /// Linear memory size in 64 KiB pages. Default: 256 (16 MiB).
    pub memory_pages: u32,
    /// First byte of the dynamic region; everything below belongs to the
    /// module's static data. Default: 1024.
    pub heap_base: u32,
    /// Output array reservation policy. Default: [`OutputCapacity::GridArea`].
    pub output_capacity: OutputCapacity,
    /// Result interpretation. Default: [`StatusPolicy::NonNegative`].
    pub status_policy: StatusPolicy,
}

impl HostConfig {
    /// Default linear memory size in pages.
    pub const DEFAULT_MEMORY_PAGES: u32 = 256;

    /// Default start of the dynamic region.
    pub const DEFAULT_HEAP_BASE: u32 = 1024;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_pages == 0 {
            return Err(ConfigError::NoMemory);
        }
        if self.memory_pages > LinearMemory::MAX_PAGES {
            return Err(ConfigError::MemoryTooLarge {
                pages: self.memory_pages,
            });
        }
        self.validate_policies()?;
        self.validate_heap_base(self.memory_bytes())
    }

    /// Checks that do not depend on who allocates the memory.
    pub(crate) fn validate_policies(&self) -> Result<(), ConfigError> {
        if self.heap_base == 0 {
            return Err(ConfigError::NullHeapBase);
        }
        if self.output_capacity == OutputCapacity::Fixed(0) {
            return Err(ConfigError::ZeroOutputCapacity);
        }
        Ok(())
    }

    pub(crate) fn validate_heap_base(&self, memory_bytes: u64) -> Result<(), ConfigError> {
        if self.heap_base as u64 >= memory_bytes {
            return Err(ConfigError::HeapBaseOutOfRange {
                heap_base: self.heap_base,
                memory_bytes,
            });
        }
        Ok(())
    }

    /// Total linear memory size in bytes.
    pub fn memory_bytes(&self) -> u64 {
        self.memory_pages as u64 * LinearMemory::PAGE_SIZE as u64
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            memory_pages: Self::DEFAULT_MEMORY_PAGES,
            heap_base: Self::DEFAULT_HEAP_BASE,
            output_capacity: OutputCapacity::default(),
            status_policy: StatusPolicy::default(),
        }
    }
}

// ── ConfigError ───────────────────────────────────────────────────

/// Errors detected during [`HostConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `memory_pages` is zero.
    NoMemory,
    /// `memory_pages` exceeds what 32-bit offsets can address.
    MemoryTooLarge {
        /// The configured page count.
        pages: u32,
    },
    /// `heap_base` is zero, which would let the arena hand out NULL.
    NullHeapBase,
    /// `heap_base` leaves no dynamic region.
    HeapBaseOutOfRange {
        /// The configured heap base.
        heap_base: u32,
        /// Total memory size in bytes.
        memory_bytes: u64,
    },
    /// A fixed output capacity of zero slots.
    ZeroOutputCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMemory => write!(f, "memory_pages must be at least 1"),
            Self::MemoryTooLarge { pages } => write!(
                f,
                "memory_pages {pages} exceeds the 32-bit limit of {}",
                LinearMemory::MAX_PAGES
            ),
            Self::NullHeapBase => write!(f, "heap_base must be non-zero"),
            Self::HeapBaseOutOfRange {
                heap_base,
                memory_bytes,
            } => write!(
                f,
                "heap_base {heap_base} leaves no room in {memory_bytes} bytes of memory"
            ),
            Self::ZeroOutputCapacity => write!(f, "fixed output capacity must be non-zero"),
        }
    }
}

impl Error for ConfigError {}
