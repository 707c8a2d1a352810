//! Impulse - mass-weighted elastic response with stress propagation
//!
//! Bodies exchange equal and opposite impulses scaled by restitution. Every
//! hit also hands the pushing body's load (`stress`) to the body it pushes,
//! so the bottom of a stack ends up carrying the weight above it.
//!
//! Velocity transfer along a contact (conveyor / friction style) and stress
//! are both accumulated during the pass and flushed in `post_update`, which
//! keeps the result independent of which body of a pair resolved first.

use crate::core::math::sign;
use crate::core::Vec2f;
use crate::domain::bodies::Bodies;
use crate::domain::body::Body;
use crate::domain::groups::GroupData;
use crate::domain::handle::BodyHandle;

use super::contact::{approach, notify, sort_by_overlap, Contact};
use super::Resolver;

/// Candidates whose penetration is this close to the deepest one on the
/// same axis still get a collision normal.
const NORMAL_TOLERANCE: i32 = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpulseInfo {
    vel_transfer_mult: Vec2f,
    vel_transfer_impulse: Vec2f,
    stress: Vec2f,
    next_stress: Vec2f,
    stress_mult: f32,
    stress_propagation_mult: f32,
}

impl Default for ImpulseInfo {
    fn default() -> Self {
        Self {
            vel_transfer_mult: Vec2f::zero(),
            vel_transfer_impulse: Vec2f::zero(),
            stress: Vec2f::zero(),
            next_stress: Vec2f::zero(),
            stress_mult: 1.0,
            stress_propagation_mult: 0.1,
        }
    }
}

impl ImpulseInfo {
    pub fn set_vel_transfer_mult_x(&mut self, value: f32) {
        self.vel_transfer_mult.x = value;
    }

    pub fn set_vel_transfer_mult_y(&mut self, value: f32) {
        self.vel_transfer_mult.y = value;
    }

    pub fn set_stress_mult(&mut self, value: f32) {
        self.stress_mult = value;
    }

    pub fn set_stress_propagation_mult(&mut self, value: f32) {
        self.stress_propagation_mult = value;
    }

    pub fn vel_transfer_mult(&self) -> Vec2f { self.vel_transfer_mult }
    pub fn vel_transfer_impulse(&self) -> Vec2f { self.vel_transfer_impulse }
    pub fn stress(&self) -> Vec2f { self.stress }
    pub fn stress_mult(&self) -> f32 { self.stress_mult }
    pub fn stress_propagation_mult(&self) -> f32 { self.stress_propagation_mult }
}

impl Body<ImpulseInfo> {
    /// Impulse damped by the stress on the perpendicular axis: a body pinned
    /// under load is harder to slide.
    pub fn apply_stressed_impulse(&mut self, impulse: Vec2f) {
        let info = &self.resolver_info;
        let inv_mass = self.inv_mass();
        let dx = impulse.x / (1.0 + info.stress.y * info.stress_propagation_mult);
        let dy = impulse.y / (1.0 + info.stress.x * info.stress_propagation_mult);
        self.velocity += Vec2f::new(dx, dy) * inv_mass;
    }

    fn apply_impulse_from(&mut self, other: &GroupData, impulse: Vec2f) {
        if self.groups().yields_to(other) {
            self.apply_stressed_impulse(impulse);
        }
    }

    fn apply_stress_from(&mut self, other: &GroupData, stress: Vec2f) {
        if self.groups().yields_to(other) {
            let scaled = (stress * (self.inv_mass() * self.resolver_info.stress_mult)).abs();
            self.resolver_info.next_stress += scaled;
        }
    }

    pub fn stress(&self) -> Vec2f {
        self.resolver_info.stress
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Impulse;

impl Resolver for Impulse {
    type Info = ImpulseInfo;

    fn name(&self) -> &'static str {
        "impulse"
    }

    fn resolve(&self, bodies: &mut Bodies<ImpulseInfo>, body: BodyHandle, to_resolve: &mut Vec<BodyHandle>) {
        sort_by_overlap(bodies, body, to_resolve);

        // Deepest push per axis and direction over the whole list
        let (mut res_x_neg, mut res_x_pos, mut res_y_neg, mut res_y_pos) = (0, 0, 0, 0);
        if let Some(me) = bodies.get(body) {
            for other in to_resolve.iter().filter_map(|h| bodies.get(*h)) {
                let contact = Contact::between(me.shape(), other.shape());
                let i = contact.intersection;
                if contact.on_x() {
                    res_x_neg = res_x_neg.min(i.x);
                    res_x_pos = res_x_pos.max(i.x);
                } else {
                    res_y_neg = res_y_neg.min(i.y);
                    res_y_pos = res_y_pos.max(i.y);
                }
            }
        }

        for &handle in to_resolve.iter() {
            let Some((me, other)) = bodies.pair_mut(body, handle) else {
                continue;
            };
            // An earlier correction in this pass may already have separated them
            if !me.shape().overlaps(other.shape()) {
                continue;
            }

            let contact = Contact::between(me.shape(), other.shape());
            let (i, resolution) = (contact.intersection, contact.resolution);

            let info = notify(me, handle, other, resolution);
            if !info.no_resolve_position {
                me.resolve_position(resolution);
            }
            if info.no_resolve_velocity {
                continue;
            }

            let (approach_x, approach_y) = approach(me, other, resolution);
            let restitution = me.restitution();
            let mut desired = me.velocity();
            let mut normal = Vec2f::zero();

            if approach_y != 0 {
                let deepest = if approach_y > 0 { res_y_neg } else { res_y_pos };
                if (i.y - deepest).abs() < NORMAL_TOLERANCE {
                    normal.y = approach_y as f32;
                }
                desired.y *= restitution.y;
            }
            if approach_x != 0 {
                let deepest = if approach_x > 0 { res_x_neg } else { res_x_pos };
                if (i.x - deepest).abs() < NORMAL_TOLERANCE {
                    normal.x = approach_x as f32;
                }
                desired.x *= restitution.x;
            }

            let vel_along_normal = (other.velocity() - me.velocity()).dot(normal);
            if vel_along_normal > 0.0 {
                continue;
            }

            let inv_mass_sum = me.inv_mass() + other.inv_mass();
            let computed_vel = if inv_mass_sum > 0.0 { vel_along_normal / inv_mass_sum } else { 0.0 };
            let impulse = Vec2f::new(
                -(1.0 + restitution.x) * computed_vel * normal.x,
                -(1.0 + restitution.y) * computed_vel * normal.y,
            );

            if inv_mass_sum > 0.0 {
                let mine = me.resolver_info.vel_transfer_mult;
                let theirs = other.resolver_info.vel_transfer_mult;
                if normal.y != 0.0 {
                    let transfer = (other.velocity().x - me.velocity().x) / inv_mass_sum;
                    me.resolver_info.vel_transfer_impulse.x += transfer * (mine.x * theirs.x).max(0.0).sqrt();
                }
                if normal.x != 0.0 {
                    let transfer = (other.velocity().y - me.velocity().y) / inv_mass_sum;
                    me.resolver_info.vel_transfer_impulse.y += transfer * (mine.y * theirs.y).max(0.0).sqrt();
                }
            }

            let (my_groups, their_groups) = (*me.groups(), *other.groups());
            me.apply_impulse_from(&their_groups, -impulse);
            other.apply_impulse_from(&my_groups, impulse);
            other.apply_stress_from(&my_groups, (me.resolver_info.stress + impulse) * me.mass());

            let velocity = me.velocity();
            me.velocity = Vec2f::new(desired.x.abs() * sign(velocity.x), desired.y.abs() * sign(velocity.y));
        }
    }

    fn post_update(&self, bodies: &mut Bodies<ImpulseInfo>) {
        let handles = bodies.handles().to_vec();
        for handle in handles {
            let Some(body) = bodies.get_mut(handle) else {
                continue;
            };
            let info = &mut body.resolver_info;
            info.stress = info.next_stress.clamp(f32::MIN_POSITIVE, f32::MAX);
            info.next_stress = Vec2f::zero();

            let transfer = std::mem::replace(&mut info.vel_transfer_impulse, Vec2f::zero());
            body.apply_stressed_impulse(transfer);
        }
    }
}
