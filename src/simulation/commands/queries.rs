use crate::core::{Vec2f, Vec2i};
use crate::domain::groups::Group;
use crate::domain::handle::BodyHandle;
use crate::spatial::query::{Area, Direction, Distance, GridQuery, Orthogonal, Point, RayCast, Traversal};
use crate::systems::resolver::Resolver;

use super::step::refresh_all;
use super::World;

pub(super) fn query<R: Resolver, T: Traversal>(world: &mut World<R>, start: Vec2f, traversal: T) -> GridQuery<'_, R::Info, T> {
    refresh_all(world);
    GridQuery::new(&world.grid, &world.bodies, start, traversal)
}

pub(super) fn query_around<R: Resolver>(world: &mut World<R>, point: Vec2i, group: Option<Group>) -> Vec<BodyHandle> {
    let mut q = query(world, point.into(), Area::around());
    let mut found = Vec::new();
    loop {
        let next = match group {
            Some(g) => q.next_in_group(g),
            None => q.next(),
        };
        match next {
            Some(h) => found.push(h),
            None => return found,
        }
    }
}

pub(super) fn query_point<R: Resolver>(world: &mut World<R>, point: Vec2f) -> Vec<BodyHandle> {
    let mut q = query(world, point, Point);
    std::iter::from_fn(|| q.next()).collect()
}

pub(super) fn query_distance<R: Resolver>(world: &mut World<R>, point: Vec2f, max_distance: f32) -> Vec<BodyHandle> {
    let mut q = query(world, point, Distance::new(max_distance));
    std::iter::from_fn(|| q.next()).collect()
}

pub(super) fn query_orthogonal<R: Resolver>(world: &mut World<R>, point: Vec2f, direction: Direction) -> Option<BodyHandle> {
    query(world, point, Orthogonal::new(direction)).next()
}

pub(super) fn query_ray<R: Resolver>(world: &mut World<R>, origin: Vec2f, direction: Vec2f) -> Option<BodyHandle> {
    query(world, origin, RayCast::new(direction)).next()
}
