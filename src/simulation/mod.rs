//! World - owns the bodies and the grid, drives the per-step pipeline
//!
//! World only orchestrates: body creation/removal lives in commands/,
//! the update pipeline in step/, queries in commands/queries.rs.
//!
//! Deletion is deferred. `del` only marks a body; it is unlinked from the
//! grid and freed at the start of the next `update`, so nothing in flight
//! during a step ever sees a dangling handle.

use std::collections::BTreeSet;

use crate::core::{Vec2f, Vec2i};
use crate::domain::bodies::Bodies;
use crate::domain::body::Body;
use crate::domain::config::WorldConfig;
use crate::domain::error::WorldError;
use crate::domain::groups::Group;
use crate::domain::handle::BodyHandle;
use crate::spatial::grid::Grid;
use crate::spatial::query::{Direction, GridQuery, Traversal};
use crate::systems::resolver::{Impulse, Resolver};

#[path = "perf/step_timer.rs"]
mod step_timer;
#[path = "perf/step_stats.rs"]
mod step_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "commands/queries.rs"]
mod queries;
mod facade;

pub use facade::CollisionWorld;
pub use step_stats::StepStats;

use step_timer::StepTimer;

pub struct World<R: Resolver = Impulse> {
    grid: Grid,
    bodies: Bodies<R::Info>,
    resolver: R,
    pending_removal: BTreeSet<BodyHandle>,

    // State
    frame: u64,

    // Step metrics
    stats_enabled: bool,
    stats: StepStats,
}

impl World<Impulse> {
    /// World with the default impulse resolver.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        Self::with_resolver(config, Impulse)
    }
}

impl<R: Resolver> World<R> {
    pub fn with_resolver(config: WorldConfig, resolver: R) -> Result<Self, WorldError> {
        let grid = Grid::from_config(&config)?;
        tracing::debug!(
            columns = config.columns,
            rows = config.rows,
            cell_size = config.cell_size,
            offset = config.offset,
            resolver = resolver.name(),
            "world created"
        );
        Ok(Self {
            grid,
            bodies: Bodies::new(),
            resolver,
            pending_removal: BTreeSet::new(),
            frame: 0,
            stats_enabled: false,
            stats: StepStats::default(),
        })
    }

    // === Bodies ===

    /// Add a body centered at `position` with full `size`.
    pub fn create_body(&mut self, position: Vec2i, size: Vec2i, is_static: bool) -> BodyHandle {
        commands::create_body(self, position, size, is_static)
    }

    /// Add an overlap-only body.
    pub fn create_sensor(&mut self, position: Vec2i, size: Vec2i) -> BodyHandle {
        commands::create_sensor(self, position, size)
    }

    /// Mark a body for removal at the start of the next update.
    /// Returns false for stale handles.
    pub fn del(&mut self, handle: BodyHandle) -> bool {
        commands::del(self, handle)
    }

    pub fn is_pending_removal(&self, handle: BodyHandle) -> bool {
        self.pending_removal.contains(&handle)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body<R::Info>> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<R::Info>> {
        self.bodies.get_mut(handle)
    }

    pub fn try_body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body<R::Info>, WorldError> {
        self.bodies.get_mut(handle).ok_or(WorldError::UnknownBody(handle))
    }

    pub fn bodies(&self) -> &Bodies<R::Info> {
        &self.bodies
    }

    /// Live bodies, including those pending removal.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    // === Stepping ===

    /// Advance the simulation by `frame_time` seconds.
    pub fn update(&mut self, frame_time: f32) {
        step::update(self, frame_time);
    }

    /// Enable or disable per-step counters (adds timing overhead when enabled)
    pub fn enable_step_stats(&mut self, enabled: bool) {
        self.stats_enabled = enabled;
        if !enabled {
            self.stats = StepStats::default();
        }
    }

    /// Last step's counters (zeros when disabled)
    pub fn step_stats(&self) -> StepStats {
        self.stats.clone()
    }

    // === Queries ===

    /// Bring every dirty body's grid membership up to date.
    pub fn refresh(&mut self) {
        step::refresh_all(self);
    }

    /// Walk the grid from `start` with any traversal.
    pub fn query<T: Traversal>(&mut self, start: Vec2f, traversal: T) -> GridQuery<'_, R::Info, T> {
        queries::query(self, start, traversal)
    }

    /// Bodies in the cell of `point` and its neighbours.
    pub fn query_around(&mut self, point: Vec2i) -> Vec<BodyHandle> {
        queries::query_around(self, point, None)
    }

    pub fn query_around_in_group(&mut self, point: Vec2i, group: Group) -> Vec<BodyHandle> {
        queries::query_around(self, point, Some(group))
    }

    /// Bodies containing `point`.
    pub fn query_point(&mut self, point: Vec2f) -> Vec<BodyHandle> {
        queries::query_point(self, point)
    }

    /// Bodies within `max_distance` of `point`, nearest cells first.
    pub fn query_distance(&mut self, point: Vec2f, max_distance: f32) -> Vec<BodyHandle> {
        queries::query_distance(self, point, max_distance)
    }

    /// First body along a grid row or column from `point`.
    pub fn query_orthogonal(&mut self, point: Vec2f, direction: Direction) -> Option<BodyHandle> {
        queries::query_orthogonal(self, point, direction)
    }

    /// First body hit by a ray.
    pub fn query_ray(&mut self, origin: Vec2f, direction: Vec2f) -> Option<BodyHandle> {
        queries::query_ray(self, origin, direction)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
