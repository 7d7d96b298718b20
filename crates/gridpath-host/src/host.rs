//! The host context and its bound form.
//!
//! # Lifecycle
//!
//! 1. [`Host::new`] allocates the linear memory and the arena over it.
//! 2. [`Host::bind`] attaches a [`PathfindModule`] and returns a [`Bound`]
//!    host, which runs one epoch per [`Bound::pathfind`] call.
//!
//! # Ownership model
//!
//! `Bound` holds `&mut Host` for as long as it lives, and every result it
//! returns is an owned copy. A reset can therefore never race a reader of
//! the previous epoch's memory: the borrow checker rejects it.

use gridpath_arena::{Arena, LinearMemory, Offset};
use gridpath_codec::{place, Point, PointArray};

use crate::config::HostConfig;
use crate::error::HostError;
use crate::imports::ArenaImports;
use crate::module::{PathfindModule, RawArgs};
use crate::status::PathfindStatus;

/// One pathfinding question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathRequest {
    /// Blocked cells.
    pub obstacles: PointArray,
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Where the path starts.
    pub start: Point,
    /// Where the path ends.
    pub end: Point,
}

impl PathRequest {
    /// Create a request.
    pub fn new(obstacles: PointArray, width: u32, height: u32, start: Point, end: Point) -> Self {
        Self {
            obstacles,
            width,
            height,
            start,
            end,
        }
    }

    /// Check the grid dimensions and that both endpoints lie on the grid.
    ///
    /// Obstacles are passed through untouched; the module decides what to
    /// do with cells outside the grid.
    pub fn validate(&self) -> Result<(), HostError> {
        let max = i32::MAX as u32;
        if self.width == 0 || self.height == 0 || self.width > max || self.height > max {
            return Err(HostError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        for point in [self.start, self.end] {
            if !point.in_grid(self.width, self.height) {
                return Err(HostError::PointOutsideGrid {
                    point,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }
}

/// A request encoded into the current epoch, ready to be passed across.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagedArgs {
    /// The encoded obstacle array.
    pub obstacles: Offset,
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// The encoded start point.
    pub start: Offset,
    /// The encoded end point.
    pub end: Offset,
    /// The empty output array.
    pub output: Offset,
    /// Slots reserved in the output array.
    pub output_capacity: u32,
    /// Longest result the module may report: one visit per cell.
    pub path_limit: u32,
}

/// Result of one boundary call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    /// The module reported success and wrote a path.
    Found {
        /// The decoded output array, in the order the module wrote it.
        path: PointArray,
        /// The raw status the module returned.
        status: i32,
    },
    /// The module reported failure. Nothing was decoded.
    NotFound {
        /// The raw status the module returned.
        status: i32,
    },
}

impl PathOutcome {
    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The path, if one was found.
    pub fn path(&self) -> Option<&PointArray> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::NotFound { .. } => None,
        }
    }

    /// Take the path out, if one was found.
    pub fn into_path(self) -> Option<PointArray> {
        match self {
            Self::Found { path, .. } => Some(path),
            Self::NotFound { .. } => None,
        }
    }

    /// The raw status the module returned.
    pub fn status(&self) -> i32 {
        match self {
            Self::Found { status, .. } | Self::NotFound { status } => *status,
        }
    }

    /// The failure code, if it is one of the well-known ones.
    pub fn failure(&self) -> Option<PathfindStatus> {
        match self {
            Self::Found { .. } => None,
            Self::NotFound { status } => PathfindStatus::from_code(*status),
        }
    }
}

/// Owns the shared memory and the arena over it.
///
/// Construct with [`Host::new`] (or [`Host::with_memory`] to supply the
/// buffer), then [`bind`](Host::bind) a module to start invoking it.
pub struct Host<M = LinearMemory> {
    arena: Arena<M>,
    config: HostConfig,
}

impl Host<LinearMemory> {
    /// Validate `config` and allocate a fresh linear memory for it.
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        config.validate()?;
        let memory = LinearMemory::with_pages(config.memory_pages)?;
        Self::with_memory(memory, config)
    }
}

impl<M: AsRef<[u8]> + AsMut<[u8]>> Host<M> {
    /// Use an existing buffer as the shared memory.
    ///
    /// `config.memory_pages` is ignored; the buffer's length is the memory
    /// size.
    pub fn with_memory(memory: M, config: HostConfig) -> Result<Self, HostError> {
        config.validate_policies()?;
        config.validate_heap_base(memory.as_ref().len() as u64)?;
        let arena = Arena::new(memory, config.heap_base)?;
        tracing::debug!(
            arena = %arena.id(),
            heap_base = config.heap_base,
            capacity = arena.capacity(),
            "host memory ready"
        );
        Ok(Self { arena, config })
    }

    /// Attach `module`.
    ///
    /// Returns `Err(HostError::HeapOverlap)` if the module's static data
    /// would overlap the arena's dynamic region.
    pub fn bind<P: PathfindModule>(&mut self, module: P) -> Result<Bound<'_, M, P>, HostError> {
        let module_heap_base = module.heap_base();
        if module_heap_base > self.arena.base() {
            return Err(HostError::HeapOverlap {
                module_heap_base,
                arena_base: self.arena.base(),
            });
        }
        tracing::debug!(module = module.name(), "module bound");
        Ok(Bound { host: self, module })
    }

    /// The configuration this host was built with.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// The arena over the shared memory.
    pub fn arena(&self) -> &Arena<M> {
        &self.arena
    }

    /// The arena over the shared memory, mutable.
    pub fn arena_mut(&mut self) -> &mut Arena<M> {
        &mut self.arena
    }

    /// Consume the host and hand the buffer back.
    pub fn into_memory(self) -> M {
        self.arena.into_memory()
    }
}

/// A host with a module attached.
pub struct Bound<'h, M, P> {
    host: &'h mut Host<M>,
    module: P,
}

impl<M, P> Bound<'_, M, P>
where
    M: AsRef<[u8]> + AsMut<[u8]>,
    P: PathfindModule,
{
    /// Run one full epoch: reset, encode the request, invoke the module,
    /// and decode its output.
    ///
    /// A module reporting failure yields `Ok(PathOutcome::NotFound)`.
    /// Allocation, decode, and termination failures are errors.
    pub fn pathfind(&mut self, request: &PathRequest) -> Result<PathOutcome, HostError> {
        self.reset();
        let args = self.stage(request)?;
        let status = self.invoke(&args)?;
        if !self.host.config.status_policy.is_success(status) {
            tracing::debug!(module = self.module.name(), status, "no path");
            return Ok(PathOutcome::NotFound { status });
        }
        let path = self.collect(&args)?;
        tracing::debug!(
            module = self.module.name(),
            status,
            len = path.len(),
            "path found"
        );
        Ok(PathOutcome::Found { path, status })
    }

    /// Wipe the arena and start a new epoch. Offsets from earlier stages
    /// become stale.
    pub fn reset(&mut self) {
        self.host.arena.reset();
    }

    /// Encode `request` and reserve the output array in the current epoch.
    pub fn stage(&mut self, request: &PathRequest) -> Result<StagedArgs, HostError> {
        request.validate()?;
        let output_capacity = self
            .host
            .config
            .output_capacity
            .resolve(request.width, request.height)
            .ok_or(HostError::InvalidGrid {
                width: request.width,
                height: request.height,
            })?;

        let path_limit = request.width.saturating_mul(request.height);

        let arena = &mut self.host.arena;
        let obstacles = place(arena, &request.obstacles)?;
        let start = place(arena, &request.start)?;
        let end = place(arena, &request.end)?;
        let output = place(arena, &PointArray::with_capacity(output_capacity))?;

        Ok(StagedArgs {
            obstacles,
            width: request.width,
            height: request.height,
            start,
            end,
            output,
            output_capacity,
            path_limit,
        })
    }

    /// Cross the boundary with previously staged arguments and return the
    /// module's raw status.
    ///
    /// Fails if any staged offset is stale, if the module terminated, or if
    /// one of its allocation requests was refused.
    pub fn invoke(&mut self, args: &StagedArgs) -> Result<i32, HostError> {
        let arena = &mut self.host.arena;
        let raw = RawArgs {
            obstacles: arena.resolve(args.obstacles)?,
            width: args.width,
            height: args.height,
            start: arena.resolve(args.start)?,
            end: arena.resolve(args.end)?,
            output: arena.resolve(args.output)?,
        };

        let mut imports = ArenaImports::new(arena);
        let status = self.module.pathfind(&mut imports, raw);
        let report = imports.finish();
        tracing::debug!(
            module = self.module.name(),
            status,
            allocations = report.allocations,
            "boundary call returned"
        );

        if let Some(code) = report.exit_code {
            return Err(HostError::ModuleTerminated { code });
        }
        if let Some(fault) = report.fault {
            return Err(HostError::ImportFault(fault));
        }
        Ok(status)
    }

    /// Decode the output array.
    ///
    /// The module may have grown the array past its reservation through
    /// `reallocate`, but never past [`StagedArgs::path_limit`] items. The
    /// items must lie in this epoch's allocations, `[base, cursor)`; the
    /// module's static data and unallocated memory are never read.
    pub fn collect(&self, args: &StagedArgs) -> Result<PointArray, HostError> {
        let arena = &self.host.arena;
        let addr = arena.resolve(args.output)?;
        let live = arena.base()..arena.cursor();
        let path = PointArray::decode_within(arena.memory(), addr, args.path_limit, live)?;
        Ok(path)
    }

    /// The host this module is bound to.
    pub fn host(&self) -> &Host<M> {
        self.host
    }

    /// The bound module.
    pub fn module(&self) -> &P {
        &self.module
    }

    /// The bound module, mutable.
    pub fn module_mut(&mut self) -> &mut P {
        &mut self.module
    }

    /// Detach and return the module.
    pub fn into_module(self) -> P {
        self.module
    }
}
