//! Retro - arcade bounce: the velocity component that drove into a contact
//! flips sign and is scaled by restitution. Mass plays no part.

use crate::domain::bodies::Bodies;
use crate::domain::handle::BodyHandle;

use super::contact::{approach, notify, sort_by_overlap, Contact};
use super::Resolver;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetroInfo;

#[derive(Clone, Copy, Debug, Default)]
pub struct Retro;

impl Resolver for Retro {
    type Info = RetroInfo;

    fn name(&self) -> &'static str {
        "retro"
    }

    fn resolve(&self, bodies: &mut Bodies<RetroInfo>, body: BodyHandle, to_resolve: &mut Vec<BodyHandle>) {
        sort_by_overlap(bodies, body, to_resolve);

        for &handle in to_resolve.iter() {
            let Some((me, other)) = bodies.pair_mut(body, handle) else {
                continue;
            };
            if !me.shape().overlaps(other.shape()) {
                continue;
            }

            let resolution = Contact::between(me.shape(), other.shape()).resolution;
            let info = notify(me, handle, other, resolution);
            if !info.no_resolve_position {
                me.resolve_position(resolution);
            }
            if info.no_resolve_velocity {
                continue;
            }

            let (approach_x, approach_y) = approach(me, other, resolution);
            let restitution = me.restitution();
            if approach_y != 0 {
                me.velocity.y *= -restitution.y;
            }
            if approach_x != 0 {
                me.velocity.x *= -restitution.x;
            }
        }
    }

    fn post_update(&self, _bodies: &mut Bodies<RetroInfo>) {}
}
