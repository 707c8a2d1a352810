use crate::core::{Aabb, Vec2f, Vec2i};
use crate::spatial::grid::{CellRange, Grid};

use super::{QueryState, Sorting, Traversal};

// ============================================================================
// Area
// ============================================================================

/// Row-major walk over a rectangle of cells, clipped to the grid.
#[derive(Clone, Copy, Debug)]
pub struct Area {
    requested: Option<CellRange>,
    range: Option<CellRange>,
}

impl Area {
    /// The start cell and its eight neighbours.
    pub fn around() -> Self {
        Self { requested: None, range: None }
    }

    /// Exactly the given cells.
    pub fn span(range: CellRange) -> Self {
        Self { requested: Some(range), range: None }
    }

    fn clip(grid: &Grid, range: CellRange) -> Option<CellRange> {
        let start = Vec2i::new(range.start.x.max(0), range.start.y.max(0));
        let end = Vec2i::new(
            range.end.x.min(grid.columns() as i32 - 1),
            range.end.y.min(grid.rows() as i32 - 1),
        );
        (start.x <= end.x && start.y <= end.y).then(|| CellRange::new(start, end))
    }
}

impl Traversal for Area {
    fn begin(&mut self, grid: &Grid, state: &mut QueryState) {
        let wanted = self.requested.unwrap_or_else(|| {
            let one = Vec2i::new(1, 1);
            CellRange::new(state.start_index - one, state.start_index + one)
        });
        self.range = Self::clip(grid, wanted);
        match self.range {
            Some(range) => state.index = range.start,
            None => state.out = true,
        }
    }

    fn is_valid(&self, _grid: &Grid, state: &QueryState) -> bool {
        !state.out && self.range.is_some_and(|r| r.contains(state.index))
    }

    fn step(&mut self, _grid: &Grid, state: &mut QueryState) {
        let Some(range) = self.range else {
            state.out = true;
            return;
        };
        if state.index.x < range.end.x {
            state.index.x += 1;
        } else {
            state.index.x = range.start.x;
            state.index.y += 1;
        }
    }

    fn reset(&mut self) {
        self.range = None;
    }
}

// ============================================================================
// Orthogonal
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    #[inline]
    pub fn delta(self) -> Vec2i {
        match self {
            Direction::Left => Vec2i::new(-1, 0),
            Direction::Right => Vec2i::new(1, 0),
            Direction::Up => Vec2i::new(0, -1),
            Direction::Down => Vec2i::new(0, 1),
        }
    }
}

/// Straight walk from the start cell to the grid border.
#[derive(Clone, Copy, Debug)]
pub struct Orthogonal {
    direction: Direction,
}

impl Orthogonal {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Traversal for Orthogonal {
    fn is_valid(&self, grid: &Grid, state: &QueryState) -> bool {
        !state.out && grid.is_index_valid(state.index)
    }

    fn step(&mut self, _grid: &Grid, state: &mut QueryState) {
        state.index += self.direction.delta();
    }

    /// Bodies the line from the start position never touches: entirely
    /// behind it, or beside it on the perpendicular axis.
    fn misses(&self, state: &QueryState, shape: &Aabb) -> bool {
        let p = state.start_pos;
        let beside = match self.direction {
            Direction::Left | Direction::Right => (shape.top() as f32) > p.y || (shape.bottom() as f32) < p.y,
            Direction::Up | Direction::Down => (shape.left() as f32) > p.x || (shape.right() as f32) < p.x,
        };
        beside
            || match self.direction {
                Direction::Left => shape.left() as f32 > p.x,
                Direction::Right => (shape.right() as f32) < p.x,
                Direction::Up => shape.top() as f32 > p.y,
                Direction::Down => (shape.bottom() as f32) < p.y,
            }
    }

    /// First point of `shape` on the line.
    fn hit_point(&self, state: &QueryState, shape: &Aabb) -> Option<Vec2f> {
        let p = state.start_pos;
        Some(match self.direction {
            Direction::Left => Vec2f::new(p.x.min(shape.right() as f32), p.y),
            Direction::Right => Vec2f::new(p.x.max(shape.left() as f32), p.y),
            Direction::Up => Vec2f::new(p.x, p.y.min(shape.bottom() as f32)),
            Direction::Down => Vec2f::new(p.x, p.y.max(shape.top() as f32)),
        })
    }

    fn sorting(&self, state: &QueryState) -> Sorting {
        Sorting::NearestTo(state.start_pos)
    }
}

// ============================================================================
// Point
// ============================================================================

/// Bodies containing one world point.
#[derive(Clone, Copy, Debug, Default)]
pub struct Point;

impl Traversal for Point {
    fn is_valid(&self, _grid: &Grid, state: &QueryState) -> bool {
        !state.out
    }

    fn step(&mut self, _grid: &Grid, state: &mut QueryState) {
        self.set_out(state);
    }

    fn misses(&self, state: &QueryState, shape: &Aabb) -> bool {
        !shape.contains_point(state.start_pos)
    }

    fn hit_point(&self, state: &QueryState, _shape: &Aabb) -> Option<Vec2f> {
        Some(state.start_pos)
    }
}

// ============================================================================
// Distance
// ============================================================================

/// Square rings of cells around the start cell, growing until a ring lies
/// entirely beyond `max_distance`. Only bodies within `max_distance` of the
/// start position qualify.
#[derive(Clone, Debug)]
pub struct Distance {
    max_distance: f32,
    ring: i32,
    ring_cells: Vec<Vec2i>,
    cursor: usize,
}

impl Distance {
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance: max_distance.max(0.0),
            ring: 0,
            ring_cells: Vec::new(),
            cursor: 0,
        }
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn ring(&self) -> i32 {
        self.ring
    }

    fn ring_cells(grid: &Grid, center: Vec2i, r: i32) -> Vec<Vec2i> {
        if r == 0 {
            return vec![center];
        }
        let mut cells = Vec::with_capacity(8 * r as usize);
        for x in center.x - r..=center.x + r {
            cells.push(Vec2i::new(x, center.y - r));
        }
        for y in center.y - r + 1..center.y + r {
            cells.push(Vec2i::new(center.x - r, y));
            cells.push(Vec2i::new(center.x + r, y));
        }
        for x in center.x - r..=center.x + r {
            cells.push(Vec2i::new(x, center.y + r));
        }
        cells.retain(|c| grid.is_index_valid(*c));
        cells
    }

    // Ring r is at least (r - 1) whole cells away from the start point.
    fn ring_in_reach(&self, grid: &Grid, r: i32) -> bool {
        let nearest = ((r - 1).max(0) * grid.cell_size()) as f32;
        let beyond_grid = r > grid.columns().max(grid.rows()) as i32;
        nearest <= self.max_distance && !beyond_grid
    }

    fn load_ring(&mut self, grid: &Grid, state: &mut QueryState) {
        loop {
            if !self.ring_in_reach(grid, self.ring) {
                self.set_out(state);
                return;
            }
            self.ring_cells = Self::ring_cells(grid, state.start_index, self.ring);
            self.cursor = 0;
            if let Some(first) = self.ring_cells.first() {
                state.index = *first;
                return;
            }
            self.ring += 1;
        }
    }
}

impl Traversal for Distance {
    fn begin(&mut self, grid: &Grid, state: &mut QueryState) {
        self.ring = 0;
        self.load_ring(grid, state);
    }

    fn is_valid(&self, grid: &Grid, state: &QueryState) -> bool {
        !state.out && grid.is_index_valid(state.index)
    }

    fn step(&mut self, grid: &Grid, state: &mut QueryState) {
        self.cursor += 1;
        match self.ring_cells.get(self.cursor) {
            Some(next) => state.index = *next,
            None => {
                self.ring += 1;
                self.load_ring(grid, state);
            }
        }
    }

    fn misses(&self, state: &QueryState, shape: &Aabb) -> bool {
        let p = state.start_pos;
        (shape.closest_point(p) - p).length() > self.max_distance
    }

    fn sorting(&self, state: &QueryState) -> Sorting {
        Sorting::NearestTo(state.start_pos)
    }

    fn reset(&mut self) {
        self.ring = 0;
        self.ring_cells.clear();
        self.cursor = 0;
    }
}
