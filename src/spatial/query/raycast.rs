use crate::core::{Aabb, Vec2f, Vec2i};
use crate::spatial::grid::Grid;

use super::{QueryState, Sorting, Traversal};

/// Default cap on visited cells.
pub const MAX_RAYCAST_STEPS: u32 = 256;

/// DDA walk through every cell a ray crosses, starting from the cell of the
/// query's start position, until it leaves the grid or runs out of steps.
///
/// Bodies in a crossed cell that the ray doesn't actually hit are skipped.
/// Candidates come nearest-first.
#[derive(Clone, Copy, Debug)]
pub struct RayCast {
    direction: Vec2f,
    max_steps: u32,
    steps: u32,
    step_x: i32,
    step_y: i32,
    t_max_x: f32,
    t_max_y: f32,
    t_delta_x: f32,
    t_delta_y: f32,
}

impl RayCast {
    pub fn new(direction: Vec2f) -> Self {
        Self::with_max_steps(direction, MAX_RAYCAST_STEPS)
    }

    pub fn with_max_steps(direction: Vec2f, max_steps: u32) -> Self {
        let direction = if direction.x.is_finite() && direction.y.is_finite() {
            direction.normalize()
        } else {
            Vec2f::zero()
        };
        Self {
            direction,
            max_steps,
            steps: 0,
            step_x: 0,
            step_y: 0,
            t_max_x: f32::INFINITY,
            t_max_y: f32::INFINITY,
            t_delta_x: f32::INFINITY,
            t_delta_y: f32::INFINITY,
        }
    }

    pub fn direction(&self) -> Vec2f {
        self.direction
    }

    /// Cells stepped past the start cell so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Ray parameter where it enters `shape` (0 when starting inside), or
    /// None if it never does.
    pub fn hit(origin: Vec2f, direction: Vec2f, shape: &Aabb) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        let axes = [
            (origin.x, direction.x, shape.left() as f32, shape.right() as f32),
            (origin.y, direction.y, shape.top() as f32, shape.bottom() as f32),
        ];
        for (o, d, lo, hi) in axes {
            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t1, mut t2) = ((lo - o) * inv, (hi - o) * inv);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[inline]
fn axis_setup(origin: f32, dir: f32, cell_origin: i32, cell_size: i32) -> (i32, f32, f32) {
    if dir > 0.0 {
        let boundary = (cell_origin + cell_size) as f32;
        (1, (boundary - origin) / dir, cell_size as f32 / dir)
    } else if dir < 0.0 {
        let boundary = cell_origin as f32;
        (-1, (boundary - origin) / dir, cell_size as f32 / -dir)
    } else {
        (0, f32::INFINITY, f32::INFINITY)
    }
}

impl Traversal for RayCast {
    fn begin(&mut self, grid: &Grid, state: &mut QueryState) {
        self.steps = 0;
        // Unclamped: a ray starting outside the grid visits nothing
        state.index = grid.raw_index_f(state.start_pos);
        let origin = grid.cell_origin(state.index);
        let cs = grid.cell_size();
        (self.step_x, self.t_max_x, self.t_delta_x) = axis_setup(state.start_pos.x, self.direction.x, origin.x, cs);
        (self.step_y, self.t_max_y, self.t_delta_y) = axis_setup(state.start_pos.y, self.direction.y, origin.y, cs);
    }

    fn is_valid(&self, grid: &Grid, state: &QueryState) -> bool {
        !state.out && self.steps <= self.max_steps && grid.is_index_valid(state.index)
    }

    fn step(&mut self, _grid: &Grid, state: &mut QueryState) {
        if self.step_x == 0 && self.step_y == 0 {
            self.set_out(state);
            return;
        }
        if self.t_max_x < self.t_max_y {
            state.index += Vec2i::new(self.step_x, 0);
            self.t_max_x += self.t_delta_x;
        } else {
            state.index += Vec2i::new(0, self.step_y);
            self.t_max_y += self.t_delta_y;
        }
        self.steps += 1;
    }

    fn misses(&self, state: &QueryState, shape: &Aabb) -> bool {
        Self::hit(state.start_pos, self.direction, shape).is_none()
    }

    fn hit_point(&self, state: &QueryState, shape: &Aabb) -> Option<Vec2f> {
        Self::hit(state.start_pos, self.direction, shape).map(|t| state.start_pos + self.direction * t)
    }

    fn sorting(&self, state: &QueryState) -> Sorting {
        Sorting::NearestTo(state.start_pos)
    }

    fn reset(&mut self) {
        self.steps = 0;
        self.t_max_x = f32::INFINITY;
        self.t_max_y = f32::INFINITY;
    }
}
