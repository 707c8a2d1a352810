use crate::core::Vec2i;
use crate::domain::body::Body;
use crate::domain::handle::BodyHandle;
use crate::systems::resolver::Resolver;

use super::World;

pub(super) fn create_body<R: Resolver>(world: &mut World<R>, position: Vec2i, size: Vec2i, is_static: bool) -> BodyHandle {
    // Grid membership is filled in by the next refresh
    world.bodies.insert(Body::new(position, size, is_static))
}

pub(super) fn create_sensor<R: Resolver>(world: &mut World<R>, position: Vec2i, size: Vec2i) -> BodyHandle {
    world.bodies.insert(Body::new_sensor(position, size))
}

pub(super) fn del<R: Resolver>(world: &mut World<R>, handle: BodyHandle) -> bool {
    if !world.bodies.contains(handle) {
        return false;
    }
    world.pending_removal.insert(handle);
    true
}

/// Unlink and free every body marked by `del`. Returns how many were freed.
pub(super) fn drain_removals<R: Resolver>(world: &mut World<R>) -> u32 {
    let mut removed = 0;
    for handle in std::mem::take(&mut world.pending_removal) {
        let Some(mut body) = world.bodies.remove(handle) else {
            continue;
        };
        world.grid.unlink(handle, &mut body.spatial);
        tracing::trace!(?handle, "body removed");
        removed += 1;
    }
    removed
}
