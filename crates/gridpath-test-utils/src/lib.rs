//! Test utilities and mock modules for gridpath development.
//!
//! Provides a [`TestWorld`] that parses small ASCII maps into
//! [`PathRequest`]s, and a set of [`PathfindModule`](gridpath_host::PathfindModule)
//! implementations in [`fixtures`] that stand in for a compiled module.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;

use gridpath_codec::{Point, PointArray};
use gridpath_host::PathRequest;
use indexmap::IndexSet;

/// A grid world for tests.
///
/// Obstacles keep insertion order, so the encoded obstacle array is
/// deterministic for a given map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestWorld {
    width: u32,
    height: u32,
    obstacles: IndexSet<Point>,
    start: Option<Point>,
    end: Option<Point>,
}

impl TestWorld {
    /// An empty `width x height` world.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            obstacles: IndexSet::new(),
            start: None,
            end: None,
        }
    }

    /// Parse an ASCII map.
    ///
    /// `#` is an obstacle, `S` the start, `E` the end, anything else an open
    /// cell. Leading and trailing blank lines and per-line indentation are
    /// ignored, so maps can be written inline in raw strings.
    ///
    /// # Panics
    ///
    /// If the rows have different lengths or the map is empty.
    pub fn parse(text: &str) -> Self {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(!rows.is_empty(), "empty map");
        let width = rows[0].chars().count();
        let mut world = Self::new(width as u32, rows.len() as u32);

        for (y, row) in rows.iter().enumerate() {
            assert_eq!(
                row.chars().count(),
                width,
                "row {y} has a different width than row 0"
            );
            for (x, c) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                match c {
                    '#' => {
                        world.obstacles.insert(p);
                    }
                    'S' => world.start = Some(p),
                    'E' => world.end = Some(p),
                    _ => {}
                }
            }
        }
        world
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn set_start(&mut self, p: Point) {
        self.start = Some(p);
    }

    pub fn set_end(&mut self, p: Point) {
        self.end = Some(p);
    }

    pub fn obstacles(&self) -> &IndexSet<Point> {
        &self.obstacles
    }

    pub fn is_blocked(&self, p: Point) -> bool {
        self.obstacles.contains(&p)
    }

    /// Flip a cell between open and blocked. Returns `true` if it is now
    /// blocked.
    pub fn toggle(&mut self, p: Point) -> bool {
        if self.obstacles.shift_remove(&p) {
            false
        } else {
            self.obstacles.insert(p);
            true
        }
    }

    /// The obstacles as an exactly-sized array.
    pub fn obstacle_array(&self) -> PointArray {
        self.obstacles.iter().copied().collect()
    }

    /// A request between the parsed `S` and `E` cells.
    ///
    /// # Panics
    ///
    /// If the map has no start or no end.
    pub fn request(&self) -> PathRequest {
        let start = self.start.expect("map has no start cell");
        let end = self.end.expect("map has no end cell");
        self.request_between(start, end)
    }

    pub fn request_between(&self, start: Point, end: Point) -> PathRequest {
        PathRequest::new(self.obstacle_array(), self.width, self.height, start, end)
    }

    /// Length in cells (endpoints included) of the shortest 4-connected
    /// path, by breadth-first search. `None` if `end` is unreachable.
    pub fn shortest_len(&self, start: Point, end: Point) -> Option<usize> {
        if self.is_blocked(start) || self.is_blocked(end) {
            return None;
        }
        let index = |p: Point| p.y as usize * self.width as usize + p.x as usize;
        let mut dist = vec![usize::MAX; self.width as usize * self.height as usize];
        let mut queue = VecDeque::new();
        dist[index(start)] = 1;
        queue.push_back(start);
        while let Some(p) = queue.pop_front() {
            if p == end {
                return Some(dist[index(p)]);
            }
            for n in neighbours(p) {
                if n.in_grid(self.width, self.height)
                    && !self.is_blocked(n)
                    && dist[index(n)] == usize::MAX
                {
                    dist[index(n)] = dist[index(p)] + 1;
                    queue.push_back(n);
                }
            }
        }
        None
    }

    /// Whether `path` is a walk from `start` to `end` of unit steps over
    /// open cells.
    pub fn is_valid_path(&self, path: &[Point], start: Point, end: Point) -> bool {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return false;
        };
        *first == start
            && *last == end
            && path
                .iter()
                .all(|p| p.in_grid(self.width, self.height) && !self.is_blocked(*p))
            && path.windows(2).all(|w| w[0].manhattan(w[1]) == 1)
    }
}

/// The four orthogonal neighbours of `p`, in a fixed order.
pub fn neighbours(p: Point) -> [Point; 4] {
    [
        Point::new(p.x + 1, p.y),
        Point::new(p.x - 1, p.y),
        Point::new(p.x, p.y + 1),
        Point::new(p.x, p.y - 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_map() {
        let world = TestWorld::parse(
            r"
            S.#
            .##
            ..E
            ",
        );
        assert_eq!((world.width(), world.height()), (3, 3));
        assert_eq!(world.start(), Some(Point::new(0, 0)));
        assert_eq!(world.end(), Some(Point::new(2, 2)));
        let obstacles: Vec<Point> = world.obstacles().iter().copied().collect();
        assert_eq!(
            obstacles,
            vec![Point::new(2, 0), Point::new(1, 1), Point::new(2, 1)]
        );
        assert_eq!(world.shortest_len(Point::new(0, 0), Point::new(2, 2)), Some(5));
    }

    #[test]
    fn toggle_flips_cells() {
        let mut world = TestWorld::new(4, 4);
        let p = Point::new(1, 2);
        assert!(world.toggle(p));
        assert!(world.is_blocked(p));
        assert!(!world.toggle(p));
        assert!(world.obstacle_array().is_empty());
    }

    #[test]
    fn walled_off_end_is_unreachable() {
        let world = TestWorld::parse(
            r"
            S.#.
            ..#E
            ",
        );
        assert_eq!(world.shortest_len(world.start().unwrap(), world.end().unwrap()), None);
    }

    #[test]
    fn path_validity() {
        let world = TestWorld::new(3, 1);
        let a = Point::new(0, 0);
        let c = Point::new(2, 0);
        assert!(world.is_valid_path(&[a, Point::new(1, 0), c], a, c));
        assert!(!world.is_valid_path(&[a, c], a, c));
        assert!(!world.is_valid_path(&[], a, c));
    }
}
