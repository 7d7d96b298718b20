//! Benchmark profiles for the gridpath boundary.
//!
//! Provides pre-built worlds for benchmarking:
//!
//! - [`open_field`]: no obstacles, corner to corner
//! - [`serpentine`]: walls with alternating gaps, forcing a path through
//!   every column
//! - [`scattered`]: deterministic pseudo-random obstacles via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gridpath_codec::Point;
use gridpath_test_utils::TestWorld;

/// An empty `width x height` world from the top-left to the bottom-right
/// corner.
pub fn open_field(width: u32, height: u32) -> TestWorld {
    let mut world = TestWorld::new(width, height);
    world.set_start(Point::new(0, 0));
    world.set_end(Point::new(width as i32 - 1, height as i32 - 1));
    world
}

/// Walls on every odd column, each with a single gap that alternates
/// between the bottom and the top row.
///
/// The shortest path snakes through every gap, which makes it close to
/// the worst case for an A* search with a Manhattan heuristic.
pub fn serpentine(width: u32, height: u32) -> TestWorld {
    let mut world = open_field(width, height);
    for (n, x) in (1..width as i32).step_by(2).enumerate() {
        let gap = if n % 2 == 0 { height as i32 - 1 } else { 0 };
        for y in (0..height as i32).filter(|&y| y != gap) {
            world.toggle(Point::new(x, y));
        }
    }
    world
}

/// Roughly `percent`% of cells blocked, placed by a simple hash of `seed`.
///
/// The start and end corners are always left open; whether they are
/// connected depends on the seed.
pub fn scattered(width: u32, height: u32, percent: u64, seed: u64) -> TestWorld {
    let mut world = open_field(width, height);
    let (start, end) = (world.start(), world.end());
    for i in 0..(width as u64 * height as u64) {
        let h = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407));
        if (h >> 33) % 100 < percent {
            let p = Point::new((i % width as u64) as i32, (i / width as u64) as i32);
            if Some(p) != start && Some(p) != end {
                world.toggle(p);
            }
        }
    }
    world
}
