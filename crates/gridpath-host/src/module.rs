//! The module seam: what the host calls, and what the module may call back.
//!
//! Everything crossing this seam is a plain integer. The module sees the
//! shared buffer only through [`HostImports`], and reads and writes
//! structures in it by raw offset arithmetic.

/// Arguments of the boundary call, as raw buffer addresses and dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawArgs {
    /// Address of the obstacle [`PointArray`](gridpath_codec::PointArray).
    pub obstacles: u32,
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Address of the start [`Point`](gridpath_codec::Point).
    pub start: u32,
    /// Address of the end [`Point`](gridpath_codec::Point).
    pub end: u32,
    /// Address of the pre-reserved output
    /// [`PointArray`](gridpath_codec::PointArray).
    pub output: u32,
}

/// The import table the host supplies to a module.
///
/// Allocation imports follow C conventions: they return `0` (NULL) on
/// failure and never panic.
pub trait HostImports {
    /// Reserve `size` bytes; returns the address, or `0` on failure.
    fn allocate(&mut self, size: u32) -> u32;

    /// Allocate `new_size` bytes and copy `min(old_size, new_size)` bytes
    /// from `offset`; returns the new address, or `0` on failure.
    fn reallocate(&mut self, offset: u32, old_size: u32, new_size: u32) -> u32;

    /// Accepted for ABI compatibility; nothing is reclaimed.
    fn release(&mut self, offset: u32);

    /// Signal an abnormal exit with `code`.
    fn terminate(&mut self, code: i32);

    /// The shared buffer.
    fn memory(&self) -> &[u8];

    /// The shared buffer, writable.
    fn memory_mut(&mut self) -> &mut [u8];
}

/// A separately compiled pathfinding module.
///
/// Implementations wrap whatever actually runs the computation (an
/// instantiated WebAssembly module, a native library, a test double). The
/// host guarantees that every input address points at a fully encoded
/// structure and that the output array reserves enough slots for the
/// longest path the grid admits.
pub trait PathfindModule {
    /// Human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// First byte past the module's static data. The host's dynamic region
    /// must start at or after this address.
    fn heap_base(&self) -> u32 {
        0
    }

    /// Run the computation.
    ///
    /// Writes the result into the array at `args.output` and returns a
    /// status whose meaning is given by the host's
    /// [`StatusPolicy`](crate::StatusPolicy).
    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32;
}

impl<P: PathfindModule + ?Sized> PathfindModule for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn heap_base(&self) -> u32 {
        (**self).heap_base()
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        (**self).pathfind(imports, args)
    }
}
