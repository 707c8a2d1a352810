use crate::core::{Aabb, Vec2f, Vec2i};

use super::Grid;

/// Inclusive rectangle of cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: Vec2i,
    pub end: Vec2i,
}

impl CellRange {
    pub fn new(start: Vec2i, end: Vec2i) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, index: Vec2i) -> bool {
        index.x >= self.start.x && index.x <= self.end.x && index.y >= self.start.y && index.y <= self.end.y
    }

    pub fn cell_count(&self) -> usize {
        let w = (self.end.x - self.start.x + 1).max(0) as usize;
        let h = (self.end.y - self.start.y + 1).max(0) as usize;
        w * h
    }

    /// Row-major walk over the range.
    pub fn iter(&self) -> impl Iterator<Item = Vec2i> {
        let CellRange { start, end } = *self;
        (start.y..=end.y).flat_map(move |y| (start.x..=end.x).map(move |x| Vec2i::new(x, y)))
    }
}

impl Grid {
    // === Index conversion ===

    /// Cell index of a world point, without clamping.
    #[inline]
    pub fn raw_index(&self, point: Vec2i) -> Vec2i {
        Vec2i::new(
            point.x.div_euclid(self.cell_size) + self.offset,
            point.y.div_euclid(self.cell_size) + self.offset,
        )
    }

    #[inline]
    pub fn raw_index_f(&self, point: Vec2f) -> Vec2i {
        let cs = self.cell_size as f32;
        Vec2i::new(
            (point.x / cs).floor() as i32 + self.offset,
            (point.y / cs).floor() as i32 + self.offset,
        )
    }

    /// Cell index of a world point, clamped to the border cell.
    #[inline]
    pub fn index(&self, point: Vec2i) -> Vec2i {
        self.clamp_index(self.raw_index(point))
    }

    #[inline]
    pub fn index_f(&self, point: Vec2f) -> Vec2i {
        self.clamp_index(self.raw_index_f(point))
    }

    #[inline]
    pub fn clamp_index(&self, index: Vec2i) -> Vec2i {
        Vec2i::new(
            index.x.clamp(0, self.columns as i32 - 1),
            index.y.clamp(0, self.rows as i32 - 1),
        )
    }

    // === Bounds checking ===
    #[inline]
    pub fn is_index_valid(&self, index: Vec2i) -> bool {
        index.x >= 0 && index.x < self.columns as i32 && index.y >= 0 && index.y < self.rows as i32
    }

    /// World-space top-left corner of a cell. The cell covers
    /// `[origin, origin + cell_size)` on both axes.
    pub fn cell_origin(&self, index: Vec2i) -> Vec2i {
        Vec2i::new(
            (index.x - self.offset) * self.cell_size,
            (index.y - self.offset) * self.cell_size,
        )
    }

    /// Cell range a shape touches, clamped to the grid, and whether clamping
    /// was needed (the shape reaches outside the grid).
    pub fn span(&self, shape: &Aabb) -> (CellRange, bool) {
        let raw_start = self.raw_index(Vec2i::new(shape.left(), shape.top()));
        let raw_end = self.raw_index(Vec2i::new(shape.right(), shape.bottom()));
        let out_of_bounds = !self.is_index_valid(raw_start) || !self.is_index_valid(raw_end);
        let range = CellRange::new(self.clamp_index(raw_start), self.clamp_index(raw_end));
        (range, out_of_bounds)
    }

    #[inline]
    pub(super) fn linear(&self, index: Vec2i) -> usize {
        debug_assert!(
            self.is_index_valid(index),
            "linear: out of bounds {:?} for {}x{} grid",
            index,
            self.columns,
            self.rows
        );
        index.y as usize * self.columns as usize + index.x as usize
    }

    #[inline]
    pub(super) fn coords(&self, linear: usize) -> Vec2i {
        let x = (linear % self.columns as usize) as i32;
        let y = (linear / self.columns as usize) as i32;
        Vec2i::new(x, y)
    }
}
