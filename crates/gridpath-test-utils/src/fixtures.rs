//! Pathfinding modules for exercising the host boundary.
//!
//! - [`ReferenceAstar`]: a working 4-connected A* that only touches the
//!   shared buffer through raw addresses and the import table.
//! - [`FailingModule`]: returns a fixed status and writes nothing.
//! - [`TerminatingModule`]: calls `terminate`.
//! - [`OverreportingModule`]: claims more items than it reserved.
//! - [`RepointingModule`]: points the output header at memory of its choosing.
//! - [`OvergrowingModule`]: grows the output past one item per cell.
//! - [`GreedyModule`]: allocates until the arena refuses.
//! - [`RecordingModule`]: decodes and records its inputs, then replies with
//!   a canned path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use gridpath_codec::wire::{read_u32_le, write_u32_le};
use gridpath_codec::{ArrayHeader, CodecError, Point, PointArray};
use gridpath_host::{HostImports, PathfindModule, PathfindStatus, RawArgs, StatusPolicy};
use smallvec::SmallVec;

// ── ReferenceAstar ────────────────────────────────────────────────

/// 4-connected A* with a Manhattan heuristic.
///
/// All working state that is proportional to the grid (the blocked map,
/// g-scores and parent links) lives in scratch regions allocated through
/// [`HostImports::allocate`]. The path is written start to end into the
/// output array; if the array is too small it is grown with
/// [`HostImports::reallocate`].
#[derive(Clone, Debug)]
pub struct ReferenceAstar {
    heap_base: u32,
    policy: StatusPolicy,
}

impl ReferenceAstar {
    /// Returns the path length on success and a [`PathfindStatus`] code on
    /// failure.
    pub fn new() -> Self {
        Self {
            heap_base: 0,
            policy: StatusPolicy::NonNegative,
        }
    }

    /// Claim static data up to `heap_base`.
    pub fn with_heap_base(mut self, heap_base: u32) -> Self {
        self.heap_base = heap_base;
        self
    }

    /// Report results the way `policy` expects. Under
    /// [`StatusPolicy::ZeroIsSuccess`] the module returns `0` on success and
    /// `1` on any failure.
    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn search(imports: &mut dyn HostImports, args: RawArgs) -> Result<u32, PathfindStatus> {
        let (width, height) = (args.width, args.height);
        let cells = width
            .checked_mul(height)
            .filter(|&c| c > 0 && c <= u32::MAX / 4)
            .ok_or(PathfindStatus::InvalidArgument)?;

        let start = Point::decode(imports.memory(), args.start).map_err(invalid)?;
        let end = Point::decode(imports.memory(), args.end).map_err(invalid)?;
        if !start.in_grid(width, height) || !end.in_grid(width, height) {
            return Err(PathfindStatus::InvalidArgument);
        }
        let index = |p: Point| p.y as u32 * width + p.x as u32;

        let blocked = alloc(imports, cells)?;
        let g = alloc(imports, cells * 4)?;
        let parent = alloc(imports, cells * 4)?;

        {
            let mem = imports.memory_mut();
            mem[blocked as usize..(blocked + cells) as usize].fill(0);
            mem[g as usize..(g + cells * 4) as usize].fill(0xFF);
        }

        let header = ArrayHeader::read(imports.memory(), args.obstacles).map_err(invalid)?;
        header.validate(imports.memory().len()).map_err(invalid)?;
        for i in 0..header.count {
            let p = Point::decode(imports.memory(), header.items_offset + i * Point::WIRE_SIZE)
                .map_err(invalid)?;
            // Obstacles off the grid cannot block anything.
            if p.in_grid(width, height) {
                imports.memory_mut()[(blocked + index(p)) as usize] = 1;
            }
        }

        let is_blocked = |mem: &[u8], p: Point| mem[(blocked + index(p)) as usize] != 0;
        if is_blocked(imports.memory(), start) || is_blocked(imports.memory(), end) {
            return Err(PathfindStatus::NoPath);
        }

        let mut open = BinaryHeap::new();
        put(imports, g, index(start), 0)?;
        open.push(Reverse((start.manhattan(end), 0u32, start)));

        let mut found = false;
        while let Some(Reverse((_, cost, current))) = open.pop() {
            if current == end {
                found = true;
                break;
            }
            if cost > get(imports, g, index(current))? {
                continue;
            }
            let next: SmallVec<[Point; 4]> = crate::neighbours(current)
                .into_iter()
                .filter(|n| n.in_grid(width, height) && !is_blocked(imports.memory(), *n))
                .collect();
            for n in next {
                let tentative = cost + 1;
                if tentative < get(imports, g, index(n))? {
                    put(imports, g, index(n), tentative)?;
                    put(imports, parent, index(n), index(current))?;
                    open.push(Reverse((
                        tentative.saturating_add(n.manhattan(end)),
                        tentative,
                        n,
                    )));
                }
            }
        }
        if !found {
            return Err(PathfindStatus::NoPath);
        }

        let len = get(imports, g, index(end))? + 1;
        let mut out = ArrayHeader::read(imports.memory(), args.output).map_err(invalid)?;
        if len > out.capacity {
            let old_size = out.capacity * Point::WIRE_SIZE;
            let grown = imports.reallocate(out.items_offset, old_size, len * Point::WIRE_SIZE);
            if grown == 0 {
                return Err(PathfindStatus::AllocationFailed);
            }
            out.items_offset = grown;
            out.capacity = len;
        }

        // Walk parent links back from the end, filling the array from its
        // last slot so the result reads start to end.
        let mut cell = index(end);
        for slot in (0..len).rev() {
            let p = Point::new((cell % width) as i32, (cell / width) as i32);
            p.encode(imports.memory_mut(), out.items_offset + slot * Point::WIRE_SIZE)
                .map_err(invalid)?;
            if slot > 0 {
                cell = get(imports, parent, cell)?;
            }
        }
        out.count = len;
        out.write(imports.memory_mut(), args.output).map_err(invalid)?;
        Ok(len)
    }
}

impl Default for ReferenceAstar {
    fn default() -> Self {
        Self::new()
    }
}

impl PathfindModule for ReferenceAstar {
    fn name(&self) -> &str {
        "reference-astar"
    }

    fn heap_base(&self) -> u32 {
        self.heap_base
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        let result = Self::search(imports, args);
        match (self.policy, result) {
            (StatusPolicy::NonNegative, Ok(len)) => i32::try_from(len).unwrap_or(i32::MAX),
            (StatusPolicy::NonNegative, Err(status)) => status.code(),
            (StatusPolicy::ZeroIsSuccess, Ok(_)) => 0,
            (StatusPolicy::ZeroIsSuccess, Err(_)) => 1,
        }
    }
}

fn invalid(_: CodecError) -> PathfindStatus {
    PathfindStatus::InvalidArgument
}

fn alloc(imports: &mut dyn HostImports, size: u32) -> Result<u32, PathfindStatus> {
    match imports.allocate(size) {
        0 => Err(PathfindStatus::AllocationFailed),
        addr => Ok(addr),
    }
}

fn get(imports: &dyn HostImports, table: u32, cell: u32) -> Result<u32, PathfindStatus> {
    read_u32_le(imports.memory(), table + cell * 4).map_err(invalid)
}

fn put(
    imports: &mut dyn HostImports,
    table: u32,
    cell: u32,
    value: u32,
) -> Result<(), PathfindStatus> {
    write_u32_le(imports.memory_mut(), table + cell * 4, value).map_err(invalid)
}

// ── FailingModule ─────────────────────────────────────────────────

/// Returns `status` without touching the buffer.
#[derive(Clone, Debug)]
pub struct FailingModule {
    pub status: i32,
}

impl FailingModule {
    pub fn new(status: i32) -> Self {
        Self { status }
    }
}

impl PathfindModule for FailingModule {
    fn name(&self) -> &str {
        "failing"
    }

    fn pathfind(&mut self, _imports: &mut dyn HostImports, _args: RawArgs) -> i32 {
        self.status
    }
}

// ── TerminatingModule ─────────────────────────────────────────────

/// Calls `terminate(code)` and then claims success, so tests can check that
/// termination wins over the returned status.
#[derive(Clone, Debug)]
pub struct TerminatingModule {
    pub code: i32,
}

impl TerminatingModule {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl PathfindModule for TerminatingModule {
    fn name(&self) -> &str {
        "terminating"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, _args: RawArgs) -> i32 {
        imports.terminate(self.code);
        0
    }
}

// ── OverreportingModule ───────────────────────────────────────────

/// Rewrites the output header so `count` exceeds `capacity` by `extra`.
#[derive(Clone, Debug)]
pub struct OverreportingModule {
    pub extra: u32,
}

impl OverreportingModule {
    pub fn new(extra: u32) -> Self {
        Self { extra }
    }
}

impl PathfindModule for OverreportingModule {
    fn name(&self) -> &str {
        "overreporting"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        let Ok(mut header) = ArrayHeader::read(imports.memory(), args.output) else {
            return PathfindStatus::InvalidArgument.code();
        };
        header.count = header.capacity.saturating_add(self.extra);
        match header.write(imports.memory_mut(), args.output) {
            Ok(()) => i32::try_from(header.count).unwrap_or(i32::MAX),
            Err(_) => PathfindStatus::InvalidArgument.code(),
        }
    }
}

// ── RepointingModule ──────────────────────────────────────────────

/// Rewrites the output header to claim two items at an address of its
/// choosing, without writing any items.
///
/// With `items_offset: None` the header points at the start argument, which
/// the host encodes directly before the end argument, so the result reads
/// back as `[start, end]`.
#[derive(Clone, Debug)]
pub struct RepointingModule {
    pub items_offset: Option<u32>,
}

impl RepointingModule {
    pub fn new(items_offset: u32) -> Self {
        Self {
            items_offset: Some(items_offset),
        }
    }

    pub fn at_start_argument() -> Self {
        Self { items_offset: None }
    }
}

impl PathfindModule for RepointingModule {
    fn name(&self) -> &str {
        "repointing"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        let header = ArrayHeader {
            items_offset: self.items_offset.unwrap_or(args.start),
            count: 2,
            capacity: 2,
        };
        match header.write(imports.memory_mut(), args.output) {
            Ok(()) => 2,
            Err(_) => PathfindStatus::InvalidArgument.code(),
        }
    }
}

// ── OvergrowingModule ─────────────────────────────────────────────

/// Grows the output array with `reallocate` to `width * height + extra`
/// slots and fills every one of them.
#[derive(Clone, Debug)]
pub struct OvergrowingModule {
    pub extra: u32,
}

impl OvergrowingModule {
    pub fn new(extra: u32) -> Self {
        Self { extra }
    }

    fn grow(&self, imports: &mut dyn HostImports, args: RawArgs) -> Result<u32, PathfindStatus> {
        let len = args
            .width
            .checked_mul(args.height)
            .and_then(|cells| cells.checked_add(self.extra))
            .ok_or(PathfindStatus::InvalidArgument)?;
        let mut out = ArrayHeader::read(imports.memory(), args.output).map_err(invalid)?;
        let grown = imports.reallocate(
            out.items_offset,
            out.capacity * Point::WIRE_SIZE,
            len * Point::WIRE_SIZE,
        );
        if grown == 0 {
            return Err(PathfindStatus::AllocationFailed);
        }
        let mem = imports.memory_mut();
        for slot in 0..len {
            Point::new(slot as i32, 0)
                .encode(mem, grown + slot * Point::WIRE_SIZE)
                .map_err(invalid)?;
        }
        out.items_offset = grown;
        out.count = len;
        out.capacity = len;
        out.write(mem, args.output).map_err(invalid)?;
        Ok(len)
    }
}

impl PathfindModule for OvergrowingModule {
    fn name(&self) -> &str {
        "overgrowing"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        match self.grow(imports, args) {
            Ok(len) => i32::try_from(len).unwrap_or(i32::MAX),
            Err(status) => status.code(),
        }
    }
}

// ── GreedyModule ──────────────────────────────────────────────────

/// Allocates `chunk` bytes at a time until `allocate` returns NULL.
#[derive(Clone, Debug)]
pub struct GreedyModule {
    pub chunk: u32,
    /// Successful allocations during the last call.
    pub granted: u32,
}

impl GreedyModule {
    pub fn new(chunk: u32) -> Self {
        Self { chunk, granted: 0 }
    }
}

impl PathfindModule for GreedyModule {
    fn name(&self) -> &str {
        "greedy"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, _args: RawArgs) -> i32 {
        self.granted = 0;
        while imports.allocate(self.chunk) != 0 {
            self.granted += 1;
        }
        PathfindStatus::AllocationFailed.code()
    }
}

// ── RecordingModule ───────────────────────────────────────────────

/// What a [`RecordingModule`] saw in one call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub args: RawArgs,
    pub obstacles: PointArray,
    pub start: Point,
    pub end: Point,
    pub output: ArrayHeader,
}

/// Decodes every input it is given, records it, and writes `reply` into the
/// output array without growing it.
#[derive(Clone, Debug, Default)]
pub struct RecordingModule {
    pub reply: Vec<Point>,
    pub calls: Vec<RecordedCall>,
}

impl RecordingModule {
    pub fn new(reply: Vec<Point>) -> Self {
        Self {
            reply,
            calls: Vec::new(),
        }
    }

    fn record(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> Result<u32, CodecError> {
        let mem = imports.memory();
        let call = RecordedCall {
            args,
            obstacles: PointArray::decode(mem, args.obstacles)?,
            start: Point::decode(mem, args.start)?,
            end: Point::decode(mem, args.end)?,
            output: ArrayHeader::read(mem, args.output)?,
        };
        let mut out = call.output;
        self.calls.push(call);

        let count = u32::try_from(self.reply.len()).map_err(|_| CodecError::TooLarge {
            capacity: out.capacity,
        })?;
        if count > out.capacity {
            return Err(CodecError::CountExceedsCapacity {
                count,
                capacity: out.capacity,
            });
        }
        let mem = imports.memory_mut();
        for (i, p) in self.reply.iter().enumerate() {
            p.encode(mem, out.items_offset + i as u32 * Point::WIRE_SIZE)?;
        }
        out.count = count;
        out.write(mem, args.output)?;
        Ok(count)
    }
}

impl PathfindModule for RecordingModule {
    fn name(&self) -> &str {
        "recording"
    }

    fn pathfind(&mut self, imports: &mut dyn HostImports, args: RawArgs) -> i32 {
        match self.record(imports, args) {
            Ok(count) => i32::try_from(count).unwrap_or(i32::MAX),
            Err(_) => PathfindStatus::InvalidArgument.code(),
        }
    }
}
