//! [`HostImports`] backed by the host's [`Arena`].
//!
//! The module allocates scratch space from the same arena the host encoded
//! its arguments into, so everything it asks for is wiped by the next epoch
//! reset. Failures cannot be reported through the C-style import signatures
//! beyond a NULL return, so the adapter records them and the host turns them
//! into errors once the call has returned.

use gridpath_arena::{Arena, ArenaError};

use crate::module::HostImports;

/// What happened on the import side during one boundary call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// The first allocation request the arena refused.
    pub fault: Option<ArenaError>,
    /// The code passed to the first `terminate` call.
    pub exit_code: Option<i32>,
    /// Number of successful `allocate` and `reallocate` calls.
    pub allocations: u32,
}

/// Adapter exposing an [`Arena`] as a module import table.
pub struct ArenaImports<'a, M> {
    arena: &'a mut Arena<M>,
    report: ImportReport,
}

impl<'a, M: AsRef<[u8]> + AsMut<[u8]>> ArenaImports<'a, M> {
    /// Wrap `arena` for the duration of one call.
    pub fn new(arena: &'a mut Arena<M>) -> Self {
        Self {
            arena,
            report: ImportReport::default(),
        }
    }

    /// Finish the call and return what was recorded.
    pub fn finish(self) -> ImportReport {
        self.report
    }

    fn record(&mut self, result: Result<u32, ArenaError>) -> u32 {
        match result {
            // Address 0 is NULL to the module; the host never hands it out
            // because the heap base is validated to be non-zero.
            Ok(addr) => {
                self.report.allocations += 1;
                addr
            }
            Err(e) => {
                tracing::warn!(error = %e, "module allocation refused");
                if self.report.fault.is_none() {
                    self.report.fault = Some(e);
                }
                0
            }
        }
    }
}

impl<M: AsRef<[u8]> + AsMut<[u8]>> HostImports for ArenaImports<'_, M> {
    fn allocate(&mut self, size: u32) -> u32 {
        let result = self.arena.allocate_raw(size);
        self.record(result)
    }

    fn reallocate(&mut self, offset: u32, old_size: u32, new_size: u32) -> u32 {
        let result = self.arena.reallocate_raw(offset, old_size, new_size);
        self.record(result)
    }

    fn release(&mut self, offset: u32) {
        tracing::trace!(offset, "release ignored");
    }

    fn terminate(&mut self, code: i32) {
        tracing::warn!(code, "module terminated");
        if self.report.exit_code.is_none() {
            self.report.exit_code = Some(code);
        }
    }

    fn memory(&self) -> &[u8] {
        self.arena.memory()
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.arena.memory_mut()
    }
}
