//! CollisionWorld - JS-facing wrapper
//!
//! Bodies are addressed by `u64` ids (packed `BodyHandle`s). The resolver is
//! picked at construction by name, so the wrapper holds one of the two
//! concrete world types and forwards every call.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::core::{Vec2f, Vec2i};
use crate::domain::body::Body;
use crate::domain::config::WorldConfig;
use crate::domain::error::WorldError;
use crate::domain::groups::Group;
use crate::domain::handle::BodyHandle;
use crate::systems::resolver::{Impulse, Retro};

use super::{StepStats, World};

enum Backend {
    Impulse(World<Impulse>),
    Retro(World<Retro>),
}

/// Run `$body` with `$w` bound to whichever world is active.
macro_rules! with_world {
    (ref $self:expr, $w:ident => $body:expr) => {
        match &$self.backend {
            Backend::Impulse($w) => $body,
            Backend::Retro($w) => $body,
        }
    };
    ($self:expr, $w:ident => $body:expr) => {
        match &mut $self.backend {
            Backend::Impulse($w) => $body,
            Backend::Retro($w) => $body,
        }
    };
}

/// Same, for a single body; yields `None` for stale ids.
macro_rules! with_body {
    ($self:expr, $id:expr, $b:ident => $body:expr) => {{
        let handle = BodyHandle::from_bits($id);
        with_world!($self, w => w.body_mut(handle).map(|$b| $body))
    }};
}

/// One body as the host's renderer sees it.
#[derive(Serialize)]
struct BodySnapshot {
    id: u64,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    vx: f32,
    vy: f32,
    #[serde(rename = "static")]
    is_static: bool,
    sensor: bool,
}

impl BodySnapshot {
    fn of<I>(handle: BodyHandle, body: &Body<I>) -> Self {
        Self {
            id: handle.to_bits(),
            x: body.position().x,
            y: body.position().y,
            width: body.width(),
            height: body.height(),
            vx: body.velocity().x,
            vy: body.velocity().y,
            is_static: body.is_static(),
            sensor: body.is_sensor(),
        }
    }
}

#[wasm_bindgen]
pub struct CollisionWorld {
    backend: Backend,
}

impl CollisionWorld {
    /// Build from a JSON `WorldConfig` and a resolver name
    /// (`"impulse"` or `"retro"`).
    pub fn from_json(config_json: &str, resolver: &str) -> Result<Self, WorldError> {
        let config = WorldConfig::from_json(config_json)?;
        let backend = match resolver {
            "impulse" => Backend::Impulse(World::with_resolver(config, Impulse)?),
            "retro" => Backend::Retro(World::with_resolver(config, Retro)?),
            other => {
                tracing::warn!(resolver = other, "unknown resolver");
                return Err(WorldError::UnknownResolver(other.to_string()));
            }
        };
        Ok(Self { backend })
    }
}

#[wasm_bindgen]
impl CollisionWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, resolver: &str) -> Result<CollisionWorld, JsValue> {
        Self::from_json(config_json, resolver).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn resolver(&self) -> String {
        match &self.backend {
            Backend::Impulse(_) => "impulse".to_string(),
            Backend::Retro(_) => "retro".to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        with_world!(ref self, w => w.frame())
    }

    #[wasm_bindgen(getter)]
    pub fn body_count(&self) -> u32 {
        with_world!(ref self, w => w.body_count() as u32)
    }

    pub fn update(&mut self, frame_time: f32) {
        with_world!(self, w => w.update(frame_time))
    }

    pub fn enable_step_stats(&mut self, enabled: bool) {
        with_world!(self, w => w.enable_step_stats(enabled))
    }

    pub fn step_stats(&self) -> StepStats {
        with_world!(ref self, w => w.step_stats())
    }

    // === Bodies ===

    pub fn create_body(&mut self, x: i32, y: i32, width: i32, height: i32, is_static: bool) -> u64 {
        let (position, size) = (Vec2i::new(x, y), Vec2i::new(width, height));
        with_world!(self, w => w.create_body(position, size, is_static).to_bits())
    }

    pub fn create_sensor(&mut self, x: i32, y: i32, width: i32, height: i32) -> u64 {
        let (position, size) = (Vec2i::new(x, y), Vec2i::new(width, height));
        with_world!(self, w => w.create_sensor(position, size).to_bits())
    }

    /// Deferred to the next update. False for stale ids.
    pub fn remove_body(&mut self, id: u64) -> bool {
        let handle = BodyHandle::from_bits(id);
        with_world!(self, w => w.del(handle))
    }

    pub fn set_position(&mut self, id: u64, x: i32, y: i32) -> bool {
        with_body!(self, id, b => b.set_position(Vec2i::new(x, y))).is_some()
    }

    pub fn set_size(&mut self, id: u64, width: i32, height: i32) -> bool {
        with_body!(self, id, b => b.set_size(Vec2i::new(width, height))).is_some()
    }

    pub fn set_velocity(&mut self, id: u64, vx: f32, vy: f32) -> bool {
        with_body!(self, id, b => b.set_velocity(Vec2f::new(vx, vy))).is_some()
    }

    pub fn set_acceleration(&mut self, id: u64, ax: f32, ay: f32) -> bool {
        with_body!(self, id, b => b.set_acceleration(Vec2f::new(ax, ay))).is_some()
    }

    pub fn apply_force(&mut self, id: u64, fx: f32, fy: f32) -> bool {
        with_body!(self, id, b => b.apply_force(Vec2f::new(fx, fy))).is_some()
    }

    pub fn set_restitution(&mut self, id: u64, rx: f32, ry: f32) -> bool {
        with_body!(self, id, b => b.set_restitution(Vec2f::new(rx, ry))).is_some()
    }

    pub fn set_mass(&mut self, id: u64, mass: f32) -> bool {
        with_body!(self, id, b => b.set_mass(mass)).is_some()
    }

    pub fn set_static(&mut self, id: u64, is_static: bool) -> bool {
        with_body!(self, id, b => b.set_static(is_static)).is_some()
    }

    pub fn set_resolve(&mut self, id: u64, resolve: bool) -> bool {
        with_body!(self, id, b => b.set_resolve(resolve)).is_some()
    }

    /// Tag the body with group `bit` (0..64).
    pub fn add_group(&mut self, id: u64, bit: u32) -> bool {
        let Some(group) = Group::new(bit) else { return false };
        with_body!(self, id, b => b.add_group(group)).is_some()
    }

    pub fn add_group_to_check(&mut self, id: u64, bit: u32) -> bool {
        let Some(group) = Group::new(bit) else { return false };
        with_body!(self, id, b => b.add_group_to_check(group)).is_some()
    }

    pub fn add_group_no_resolve(&mut self, id: u64, bit: u32) -> bool {
        let Some(group) = Group::new(bit) else { return false };
        with_body!(self, id, b => b.add_group_no_resolve(group)).is_some()
    }

    pub fn position_x(&self, id: u64) -> Option<i32> {
        let handle = BodyHandle::from_bits(id);
        with_world!(ref self, w => w.body(handle).map(|b| b.position().x))
    }

    pub fn position_y(&self, id: u64) -> Option<i32> {
        let handle = BodyHandle::from_bits(id);
        with_world!(ref self, w => w.body(handle).map(|b| b.position().y))
    }

    // === Queries ===

    /// Ids of bodies containing the point.
    pub fn query_point(&mut self, x: f32, y: f32) -> Vec<u64> {
        let found = with_world!(self, w => w.query_point(Vec2f::new(x, y)));
        found.into_iter().map(BodyHandle::to_bits).collect()
    }

    /// Id of the first body hit by a ray, if any.
    pub fn query_ray(&mut self, x: f32, y: f32, dx: f32, dy: f32) -> Option<u64> {
        let hit = with_world!(self, w => w.query_ray(Vec2f::new(x, y), Vec2f::new(dx, dy)));
        hit.map(BodyHandle::to_bits)
    }

    /// Every live body as JSON: `[{ id, x, y, width, height, vx, vy, static, sensor }]`.
    pub fn snapshot_json(&self) -> String {
        let snapshot: Vec<BodySnapshot> = with_world!(ref self, w => w
            .bodies()
            .iter()
            .map(|(h, b)| BodySnapshot::of(h, b))
            .collect());
        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "snapshot serialization failed");
            String::from("[]")
        })
    }
}
