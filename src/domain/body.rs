//! Body - a simulated rectangle
//!
//! The body stores its current shape and the shape it had before the last
//! integration; resolvers compare both to tell a fresh impact from a contact
//! that was already there.

use std::any::Any;

use crate::core::{Aabb, Delegate, Vec2f, Vec2i};
use crate::spatial::grid::SpatialInfo;

use super::groups::{Group, GroupData};
use super::handle::BodyHandle;
use super::info::{DetectionInfo, ResolutionInfo, UserData};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Detects and resolves.
    Body,
    /// Detects only; never pushes or gets pushed.
    Sensor,
}

/// Mass and its cached inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassData {
    mass: f32,
    inv_mass: f32,
}

impl MassData {
    pub fn new(mass: f32) -> Self {
        let mut data = Self { mass: 0.0, inv_mass: 0.0 };
        data.set_mass(mass);
        data
    }

    /// Non-positive or non-finite mass is treated as immovable (inverse 0).
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if mass > 0.0 && mass.is_finite() { 1.0 / mass } else { 0.0 };
    }

    #[inline]
    pub fn mass(&self) -> f32 { self.mass }

    #[inline]
    pub fn inv_mass(&self) -> f32 { self.inv_mass }
}

impl Default for MassData {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// `I` is the per-body state of the active resolver.
pub struct Body<I> {
    // === Shape ===
    kind: BodyKind,
    pub(crate) shape: Aabb,
    pub(crate) old_shape: Aabb,

    // === Kinematics ===
    is_static: bool,
    resolve: bool,
    pub(crate) velocity: Vec2f,
    acceleration: Vec2f,
    /// Forces applied since the last integration
    force: Vec2f,
    restitution: Vec2f,
    mass: MassData,
    /// Sub-unit motion carried between integer position steps
    remainder: Vec2f,

    // === Filtering / host data ===
    groups: GroupData,
    user_data: Option<UserData>,

    // === Bookkeeping ===
    pub(crate) out_of_bounds: bool,
    pub(crate) spatial: SpatialInfo,
    pub(crate) bodies_to_resolve: Vec<BodyHandle>,
    pub(crate) resolver_info: I,

    // === Notifications ===
    pub on_pre_update: Delegate<()>,
    pub on_post_update: Delegate<()>,
    pub on_detection: Delegate<DetectionInfo>,
    pub on_resolution: Delegate<ResolutionInfo>,
    pub on_out_of_bounds: Delegate<()>,
}

impl<I: Default> Body<I> {
    /// Create a body centered at `position` with full `size`.
    pub fn new(position: Vec2i, size: Vec2i, is_static: bool) -> Self {
        let shape = Aabb::from_size(position, size);
        Self {
            kind: BodyKind::Body,
            shape,
            old_shape: shape,
            is_static,
            resolve: true,
            velocity: Vec2f::zero(),
            acceleration: Vec2f::zero(),
            force: Vec2f::zero(),
            restitution: Vec2f::zero(),
            mass: MassData::default(),
            remainder: Vec2f::zero(),
            groups: GroupData::new(),
            user_data: None,
            out_of_bounds: false,
            spatial: SpatialInfo::new(),
            bodies_to_resolve: Vec::new(),
            resolver_info: I::default(),
            on_pre_update: Delegate::new(),
            on_post_update: Delegate::new(),
            on_detection: Delegate::new(),
            on_resolution: Delegate::new(),
            on_out_of_bounds: Delegate::new(),
        }
    }

    /// Overlap-only body: static, never resolves, never resolved against.
    pub fn new_sensor(position: Vec2i, size: Vec2i) -> Self {
        let mut body = Self::new(position, size, true);
        body.kind = BodyKind::Sensor;
        body.resolve = false;
        body
    }
}

impl<I> Body<I> {
    // === Setters ===

    pub fn set_position(&mut self, position: Vec2i) {
        self.old_shape = self.shape;
        self.shape.set_position(position);
        self.spatial.invalidate();
    }

    pub fn set_x(&mut self, x: i32) {
        self.old_shape = self.shape;
        self.shape.set_x(x);
        self.spatial.invalidate();
    }

    pub fn set_y(&mut self, y: i32) {
        self.old_shape = self.shape;
        self.shape.set_y(y);
        self.spatial.invalidate();
    }

    pub fn set_size(&mut self, size: Vec2i) {
        self.shape.set_size(size);
        self.spatial.invalidate();
    }

    pub fn set_width(&mut self, width: i32) {
        self.shape.set_width(width);
        self.spatial.invalidate();
    }

    pub fn set_height(&mut self, height: i32) {
        self.shape.set_height(height);
        self.spatial.invalidate();
    }

    pub fn set_velocity(&mut self, velocity: Vec2f) {
        self.velocity = velocity;
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.velocity.y = y;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2f) {
        self.acceleration = acceleration;
    }

    pub fn set_restitution(&mut self, restitution: Vec2f) {
        self.restitution = restitution;
    }

    pub fn set_restitution_x(&mut self, r: f32) {
        self.restitution.x = r;
    }

    pub fn set_restitution_y(&mut self, r: f32) {
        self.restitution.y = r;
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass.set_mass(mass);
    }

    /// Sensors stay static.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static || self.kind == BodyKind::Sensor;
    }

    /// Sensors never resolve.
    pub fn set_resolve(&mut self, resolve: bool) {
        self.resolve = resolve && self.kind == BodyKind::Body;
    }

    pub fn set_user_data(&mut self, data: UserData) {
        self.user_data = Some(data);
    }

    pub fn clear_user_data(&mut self) {
        self.user_data = None;
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.add_group(group);
        self.spatial.invalidate();
    }

    pub fn remove_group(&mut self, group: Group) {
        self.groups.remove_group(group);
        self.spatial.invalidate();
    }

    pub fn add_group_to_check(&mut self, group: Group) {
        self.groups.add_group_to_check(group);
    }

    pub fn remove_group_to_check(&mut self, group: Group) {
        self.groups.remove_group_to_check(group);
    }

    pub fn add_group_no_resolve(&mut self, group: Group) {
        self.groups.add_group_no_resolve(group);
    }

    pub fn remove_group_no_resolve(&mut self, group: Group) {
        self.groups.remove_group_no_resolve(group);
    }

    // === Getters ===

    #[inline]
    pub fn kind(&self) -> BodyKind { self.kind }
    #[inline]
    pub fn shape(&self) -> &Aabb { &self.shape }
    #[inline]
    pub fn old_shape(&self) -> &Aabb { &self.old_shape }
    #[inline]
    pub fn position(&self) -> Vec2i { self.shape.position() }
    #[inline]
    pub fn size(&self) -> Vec2i { self.shape.size() }
    #[inline]
    pub fn width(&self) -> i32 { self.shape.width() }
    #[inline]
    pub fn height(&self) -> i32 { self.shape.height() }
    #[inline]
    pub fn velocity(&self) -> Vec2f { self.velocity }
    #[inline]
    pub fn acceleration(&self) -> Vec2f { self.acceleration }
    #[inline]
    pub fn restitution(&self) -> Vec2f { self.restitution }
    #[inline]
    pub fn is_static(&self) -> bool { self.is_static }
    #[inline]
    pub fn is_sensor(&self) -> bool { self.kind == BodyKind::Sensor }
    #[inline]
    pub fn resolve(&self) -> bool { self.resolve }
    #[inline]
    pub fn groups(&self) -> &GroupData { &self.groups }
    #[inline]
    pub fn is_out_of_bounds(&self) -> bool { self.out_of_bounds }
    #[inline]
    pub fn spatial(&self) -> &SpatialInfo { &self.spatial }

    /// Static bodies always report 0.
    #[inline]
    pub fn mass(&self) -> f32 {
        if self.is_static { 0.0 } else { self.mass.mass() }
    }

    /// Static bodies always report 0.
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.is_static { 0.0 } else { self.mass.inv_mass() }
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.user_data.as_ref()
    }

    pub fn user_data_as<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref().and_then(|d| d.downcast_ref::<T>())
    }

    /// Bodies resolved against during the last step, in resolution order.
    pub fn bodies_to_resolve(&self) -> &[BodyHandle] {
        &self.bodies_to_resolve
    }

    pub fn resolver_info(&self) -> &I {
        &self.resolver_info
    }

    pub fn resolver_info_mut(&mut self) -> &mut I {
        &mut self.resolver_info
    }

    pub fn has_moved_left(&self) -> bool { self.shape.x() < self.old_shape.x() }
    pub fn has_moved_right(&self) -> bool { self.shape.x() > self.old_shape.x() }
    pub fn has_moved_up(&self) -> bool { self.shape.y() < self.old_shape.y() }
    pub fn has_moved_down(&self) -> bool { self.shape.y() > self.old_shape.y() }

    // === Dynamics ===

    /// Accumulated until the next integration, then cleared.
    pub fn apply_force(&mut self, force: Vec2f) {
        if !self.is_static {
            self.force += force;
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec2f) {
        self.velocity += impulse * self.inv_mass();
    }

    /// Push the shape by a resolver's correction.
    pub fn resolve_position(&mut self, offset: Vec2i) {
        if offset == Vec2i::zero() {
            return;
        }
        self.shape.translate(offset);
        self.spatial.invalidate();
    }

    /// Whether `other` belongs in this body's resolve list.
    pub(crate) fn can_resolve_against<J>(&self, other: &Body<J>) -> bool {
        self.resolve
            && self.kind == BodyKind::Body
            && other.kind == BodyKind::Body
            && !(self.is_static && other.is_static)
            && self.groups.must_resolve_against(&other.groups)
    }

    /// Semi-implicit Euler step. Static bodies and sensors never move here.
    pub(crate) fn integrate(&mut self, frame_time: f32) {
        if self.is_static {
            self.force = Vec2f::zero();
            return;
        }

        self.old_shape = self.shape;
        self.velocity += (self.acceleration + self.force * self.mass.inv_mass()) * frame_time;
        self.force = Vec2f::zero();

        let delta = self.velocity * frame_time + self.remainder;
        let step = delta.to_vec2i();
        self.remainder = delta - Vec2f::from(step);
        if step != Vec2i::zero() {
            self.shape.translate(step);
            self.spatial.invalidate();
        }
    }
}

impl<I: std::fmt::Debug> std::fmt::Debug for Body<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("kind", &self.kind)
            .field("shape", &self.shape)
            .field("old_shape", &self.old_shape)
            .field("velocity", &self.velocity)
            .field("is_static", &self.is_static)
            .field("resolve", &self.resolve)
            .field("groups", &self.groups)
            .field("resolver_info", &self.resolver_info)
            .finish_non_exhaustive()
    }
}
