//! Aabb - integer axis-aligned rectangle (center + half extent)
//!
//! Every body owns one of these for its current shape and one snapshot of the
//! previous frame. All edges are inclusive: two boxes that share an edge overlap.

use serde::{Deserialize, Serialize};

use super::math::{Vec2f, Vec2i};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabb {
    position: Vec2i,
    half_size: Vec2i,
}

impl Aabb {
    /// Create from center and half extent. Negative half extents clamp to zero.
    pub fn new(position: Vec2i, half_size: Vec2i) -> Self {
        Self {
            position,
            half_size: Vec2i::new(half_size.x.max(0), half_size.y.max(0)),
        }
    }

    /// Create from center and full size (odd sizes lose their last unit).
    pub fn from_size(position: Vec2i, size: Vec2i) -> Self {
        Self::new(position, size / 2)
    }

    // === Accessors ===
    #[inline]
    pub fn position(&self) -> Vec2i { self.position }
    #[inline]
    pub fn x(&self) -> i32 { self.position.x }
    #[inline]
    pub fn y(&self) -> i32 { self.position.y }
    #[inline]
    pub fn left(&self) -> i32 { self.position.x - self.half_size.x }
    #[inline]
    pub fn right(&self) -> i32 { self.position.x + self.half_size.x }
    #[inline]
    pub fn top(&self) -> i32 { self.position.y - self.half_size.y }
    #[inline]
    pub fn bottom(&self) -> i32 { self.position.y + self.half_size.y }
    #[inline]
    pub fn half_size(&self) -> Vec2i { self.half_size }
    #[inline]
    pub fn half_width(&self) -> i32 { self.half_size.x }
    #[inline]
    pub fn half_height(&self) -> i32 { self.half_size.y }
    #[inline]
    pub fn width(&self) -> i32 { self.half_size.x * 2 }
    #[inline]
    pub fn height(&self) -> i32 { self.half_size.y * 2 }
    #[inline]
    pub fn size(&self) -> Vec2i { self.half_size * 2 }

    // === Mutators ===
    pub fn set_position(&mut self, position: Vec2i) {
        self.position = position;
    }

    pub fn set_x(&mut self, x: i32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.position.y = y;
    }

    pub fn set_size(&mut self, size: Vec2i) {
        self.set_width(size.x);
        self.set_height(size.y);
    }

    pub fn set_width(&mut self, width: i32) {
        self.half_size.x = (width / 2).max(0);
    }

    pub fn set_height(&mut self, height: i32) {
        self.half_size.y = (height / 2).max(0);
    }

    pub fn translate(&mut self, offset: Vec2i) {
        self.position += offset;
    }

    // === Predicates ===

    /// Closed-interval overlap on both axes.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right() >= other.left()
            && self.left() <= other.right()
            && self.bottom() >= other.top()
            && self.top() <= other.bottom()
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2f) -> bool {
        point.x >= self.left() as f32
            && point.x <= self.right() as f32
            && point.y >= self.top() as f32
            && point.y <= self.bottom() as f32
    }

    #[inline]
    pub fn is_left_of(&self, other: &Aabb) -> bool {
        self.right() <= other.left()
    }

    #[inline]
    pub fn is_right_of(&self, other: &Aabb) -> bool {
        self.left() >= other.right()
    }

    #[inline]
    pub fn is_above(&self, other: &Aabb) -> bool {
        self.bottom() <= other.top()
    }

    #[inline]
    pub fn is_below(&self, other: &Aabb) -> bool {
        self.top() >= other.bottom()
    }

    // === Contact math ===

    /// Signed horizontal offset that pushes `self` out of `other` by the shorter way.
    pub fn min_intersection_x(&self, other: &Aabb) -> i32 {
        let left = other.left() - self.right();
        let right = other.right() - self.left();
        if left.abs() < right.abs() { left } else { right }
    }

    /// Signed vertical offset that pushes `self` out of `other` by the shorter way.
    pub fn min_intersection_y(&self, other: &Aabb) -> i32 {
        let top = other.top() - self.bottom();
        let bottom = other.bottom() - self.top();
        if top.abs() < bottom.abs() { top } else { bottom }
    }

    pub fn min_intersection(&self, other: &Aabb) -> Vec2i {
        Vec2i::new(self.min_intersection_x(other), self.min_intersection_y(other))
    }

    /// Minimum translation vector: only the axis of smaller penetration is kept.
    pub fn min_translation(&self, other: &Aabb) -> Vec2i {
        let ix = self.min_intersection_x(other);
        let iy = self.min_intersection_y(other);
        if ix.abs() < iy.abs() { Vec2i::new(ix, 0) } else { Vec2i::new(0, iy) }
    }

    /// Area of the intersection rectangle (0 when disjoint or touching).
    pub fn overlap_area(&self, other: &Aabb) -> i64 {
        let w = (self.right().min(other.right()) - self.left().max(other.left())).max(0) as i64;
        let h = (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0) as i64;
        w * h
    }

    /// Point of this box closest to `point`.
    pub fn closest_point(&self, point: Vec2f) -> Vec2f {
        Vec2f::new(
            point.x.clamp(self.left() as f32, self.right() as f32),
            point.y.clamp(self.top() as f32, self.bottom() as f32),
        )
    }
}
