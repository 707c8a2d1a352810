use crate::domain::handle::BodyHandle;
use crate::domain::info::DetectionInfo;
use crate::spatial::query::{Area, GridQuery};
use crate::systems::resolver::Resolver;

use super::commands::drain_removals;
use super::{StepStats, StepTimer, World};

pub(super) fn update<R: Resolver>(world: &mut World<R>, frame_time: f32) {
    let stats_on = world.stats_enabled;
    let step_start = if stats_on { Some(StepTimer::start()) } else { None };
    let mut stats = StepStats::default();

    // Deferred deletions go first: nothing below may see a removed body
    stats.bodies_removed = drain_removals(world);
    stats.out_of_bounds += refresh_all(world);

    let handles = world.bodies.handles().to_vec();
    for handle in handles {
        update_body(world, handle, frame_time, &mut stats);
    }

    world.resolver.post_update(&mut world.bodies);
    world.frame += 1;

    if let Some(t0) = step_start {
        stats.step_ms = t0.elapsed_ms();
        stats.frame = world.frame;
        world.stats = stats;
    }
}

/// Sync every dirty body. Returns how many left the grid.
pub(super) fn refresh_all<R: Resolver>(world: &mut World<R>) -> u32 {
    let handles = world.bodies.handles().to_vec();
    handles.into_iter().filter(|h| refresh(world, *h)).count() as u32
}

/// Sync one body's grid membership if it is dirty. Returns true when the
/// body was found outside the grid (flag raised, notification fired).
pub(super) fn refresh<R: Resolver>(world: &mut World<R>, handle: BodyHandle) -> bool {
    let Some(body) = world.bodies.get_mut(handle) else {
        return false;
    };
    if !body.spatial.is_dirty() {
        return false;
    }
    let shape = *body.shape();
    let groups = body.groups().groups();
    let out_of_bounds = world.grid.sync(handle, &shape, groups, &mut body.spatial);
    if out_of_bounds && !body.out_of_bounds {
        tracing::trace!(?handle, ?shape, "body left the grid");
        body.out_of_bounds = true;
        body.on_out_of_bounds.fire(&mut ());
        return true;
    }
    false
}

/// pre-update -> integrate -> detect -> resolve -> post-update
fn update_body<R: Resolver>(world: &mut World<R>, handle: BodyHandle, frame_time: f32, stats: &mut StepStats) {
    let Some(body) = world.bodies.get_mut(handle) else {
        return;
    };

    body.on_pre_update.fire(&mut ());
    if body.out_of_bounds {
        body.out_of_bounds = false;
        stats.bodies_skipped += 1;
        return;
    }

    body.integrate(frame_time);
    if refresh(world, handle) {
        stats.out_of_bounds += 1;
    }

    let mut to_resolve = detect(world, handle, frame_time, stats);
    if !to_resolve.is_empty() {
        stats.resolutions += to_resolve.len() as u32;
        world.resolver.resolve(&mut world.bodies, handle, &mut to_resolve);
        if refresh(world, handle) {
            stats.out_of_bounds += 1;
        }
    }

    let Some(body) = world.bodies.get_mut(handle) else {
        return;
    };
    body.bodies_to_resolve = to_resolve;
    body.on_post_update.fire(&mut ());
    stats.bodies_updated += 1;
}

/// Fire detection for every overlapping body this one checks for, and
/// return the ones it must resolve against.
fn detect<R: Resolver>(world: &mut World<R>, handle: BodyHandle, frame_time: f32, stats: &mut StepStats) -> Vec<BodyHandle> {
    // Reuse last step's allocation
    let mut to_resolve = world
        .bodies
        .get_mut(handle)
        .map(|b| std::mem::take(&mut b.bodies_to_resolve))
        .unwrap_or_default();
    to_resolve.clear();

    let mut detections = Vec::new();
    {
        let Some(me) = world.bodies.get(handle) else {
            return to_resolve;
        };
        let (range, _) = world.grid.span(me.shape());
        let mut query = GridQuery::new(&world.grid, &world.bodies, me.shape().position().into(), Area::span(range));
        while let Some(other_handle) = query.next() {
            if other_handle == handle {
                continue;
            }
            let Some(other) = world.bodies.get(other_handle) else {
                continue;
            };
            if !me.groups().must_check_against(other.groups()) || !me.shape().overlaps(other.shape()) {
                continue;
            }
            detections.push(DetectionInfo {
                other: other_handle,
                frame_time,
                user_data: other.user_data().cloned(),
                intersection: me.shape().min_intersection(other.shape()),
            });
            if me.can_resolve_against(other) {
                to_resolve.push(other_handle);
            }
        }
    }

    stats.detections += detections.len() as u32;
    if let Some(me) = world.bodies.get_mut(handle) {
        for mut info in detections {
            me.on_detection.fire(&mut info);
        }
    }
    to_resolve
}
