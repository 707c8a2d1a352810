//! GridQuery - lazy, restartable body lookups over grid cells
//!
//! A `Traversal` decides which cells are visited and in what order; the query
//! drains each cell's bodies before asking the traversal for the next cell.
//! Nothing is collected up front, so a caller that stops after the first hit
//! never touches the remaining cells.
//!
//! Queries read cell membership as-is: refresh dirty bodies first
//! (`World::query*` does).

use std::collections::HashSet;

use crate::core::{Aabb, Vec2f, Vec2i};
use crate::domain::bodies::Bodies;
use crate::domain::groups::Group;
use crate::domain::handle::BodyHandle;
use crate::spatial::grid::Grid;

mod raycast;
mod traversal;

pub use raycast::RayCast;
pub use traversal::{Area, Direction, Distance, Orthogonal, Point};

/// Order of the candidates taken from one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sorting {
    /// Order the bodies entered the cell.
    Insertion,
    /// Closest shape to the point first, insertion order on ties.
    NearestTo(Vec2f),
}

/// Cursor shared by every traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueryState {
    /// World position the query started from
    pub start_pos: Vec2f,
    /// Clamped cell of `start_pos`
    pub start_index: Vec2i,
    /// Cell currently being visited
    pub index: Vec2i,
    pub(crate) out: bool,
}

impl QueryState {
    fn new(grid: &Grid, start_pos: Vec2f) -> Self {
        let start_index = grid.index_f(start_pos);
        Self {
            start_pos,
            start_index,
            index: start_index,
            out: false,
        }
    }

    #[inline]
    pub fn is_out(&self) -> bool {
        self.out
    }
}

/// Cell walk policy.
pub trait Traversal {
    /// Position the cursor on the first cell.
    fn begin(&mut self, _grid: &Grid, state: &mut QueryState) {
        state.index = state.start_index;
    }

    /// Whether the cursor still points at a cell to visit.
    fn is_valid(&self, grid: &Grid, state: &QueryState) -> bool;

    /// Advance to the next cell.
    fn step(&mut self, grid: &Grid, state: &mut QueryState);

    /// Bodies in a visited cell that still don't qualify.
    fn misses(&self, _state: &QueryState, _shape: &Aabb) -> bool {
        false
    }

    /// World point where the walk meets a body it returned, for traversals
    /// that follow a line or a point.
    fn hit_point(&self, _state: &QueryState, _shape: &Aabb) -> Option<Vec2f> {
        None
    }

    fn sorting(&self, _state: &QueryState) -> Sorting {
        Sorting::Insertion
    }

    /// End the walk; `is_valid` must return false afterwards.
    fn set_out(&mut self, state: &mut QueryState) {
        state.out = true;
    }

    /// Forget traversal-private state. Called by `GridQuery::reset`.
    fn reset(&mut self) {}
}

pub struct GridQuery<'w, I, T> {
    grid: &'w Grid,
    bodies: &'w Bodies<I>,
    traversal: T,
    state: QueryState,
    // Remaining candidates of the current cell, next one last
    candidates: Vec<BodyHandle>,
    loaded: bool,
    seen: HashSet<BodyHandle>,
    visited: Vec<Vec2i>,
    last_pos: Option<Vec2i>,
    last_hit: Option<Vec2f>,
}

impl<'w, I, T: Traversal> GridQuery<'w, I, T> {
    pub fn new(grid: &'w Grid, bodies: &'w Bodies<I>, start_pos: Vec2f, mut traversal: T) -> Self {
        let mut state = QueryState::new(grid, start_pos);
        traversal.begin(grid, &mut state);
        Self {
            grid,
            bodies,
            traversal,
            state,
            candidates: Vec::new(),
            loaded: false,
            seen: HashSet::new(),
            visited: Vec::new(),
            last_pos: None,
            last_hit: None,
        }
    }

    /// Next qualifying body, or None once the traversal is exhausted.
    pub fn next(&mut self) -> Option<BodyHandle> {
        self.advance(None)
    }

    /// Like `next`, restricted to bodies tagged with `group`.
    pub fn next_in_group(&mut self, group: Group) -> Option<BodyHandle> {
        self.advance(Some(group))
    }

    /// Every remaining cell index of the walk, without looking at bodies.
    /// Leaves the query exhausted.
    pub fn all_cells(&mut self) -> Vec<Vec2i> {
        let mut cells = Vec::new();
        if self.loaded {
            self.candidates.clear();
            self.loaded = false;
            self.traversal.step(self.grid, &mut self.state);
        }
        while self.traversal.is_valid(self.grid, &self.state) {
            cells.push(self.state.index);
            self.traversal.step(self.grid, &mut self.state);
        }
        self.visited.extend_from_slice(&cells);
        cells
    }

    /// Rewind to the start cell, traversal state included.
    pub fn reset(&mut self) {
        self.traversal.reset();
        self.state = QueryState::new(self.grid, self.state.start_pos);
        self.traversal.begin(self.grid, &mut self.state);
        self.candidates.clear();
        self.loaded = false;
        self.seen.clear();
        self.visited.clear();
        self.last_pos = None;
        self.last_hit = None;
    }

    /// Stop the walk early.
    pub fn stop(&mut self) {
        self.candidates.clear();
        self.traversal.set_out(&mut self.state);
    }

    /// Cells visited so far, in visit order.
    pub fn visited_indexes(&self) -> &[Vec2i] {
        &self.visited
    }

    /// Cell the last returned body was found in.
    pub fn last_pos(&self) -> Option<Vec2i> {
        self.last_pos
    }

    /// World point where the walk met the last returned body. Only line and
    /// point traversals report one; area walks leave it `None`.
    pub fn last_hit(&self) -> Option<Vec2f> {
        self.last_hit
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn traversal(&self) -> &T {
        &self.traversal
    }

    fn advance(&mut self, group: Option<Group>) -> Option<BodyHandle> {
        loop {
            if !self.loaded {
                if !self.traversal.is_valid(self.grid, &self.state) {
                    return None;
                }
                self.load_cell(group);
            }

            while let Some(handle) = self.candidates.pop() {
                if self.seen.contains(&handle) {
                    continue;
                }
                let Some(body) = self.bodies.get(handle) else {
                    continue;
                };
                if let Some(g) = group {
                    if !body.groups().groups().contains(g) {
                        continue;
                    }
                }
                self.seen.insert(handle);
                if self.traversal.misses(&self.state, body.shape()) {
                    continue;
                }
                self.last_pos = Some(self.state.index);
                self.last_hit = self.traversal.hit_point(&self.state, body.shape());
                return Some(handle);
            }

            self.loaded = false;
            self.traversal.step(self.grid, &mut self.state);
        }
    }

    fn load_cell(&mut self, group: Option<Group>) {
        let index = self.state.index;
        let cell = self.grid.cell(index);
        let source = match group {
            Some(g) => cell.bodies_in_group(g),
            None => cell.bodies(),
        };
        self.candidates.clear();
        self.candidates
            .extend(source.iter().copied().filter(|h| !self.seen.contains(h)));

        if let Sorting::NearestTo(point) = self.traversal.sorting(&self.state) {
            let bodies = self.bodies;
            let distance = |h: &BodyHandle| {
                bodies
                    .get(*h)
                    .map(|b| (b.shape().closest_point(point) - point).length_squared())
                    .unwrap_or(f32::INFINITY)
            };
            self.candidates
                .sort_by(|a, b| distance(a).total_cmp(&distance(b)));
        }
        // pop() takes from the back
        self.candidates.reverse();
        self.visited.push(index);
        self.loaded = true;
    }
}

#[cfg(test)]
mod tests;
