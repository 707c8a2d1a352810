use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::domain::info::DetectionInfo;
use crate::spatial::query::Point;
use crate::systems::resolver::Retro;

fn g(bit: u32) -> Group {
    Group::new(bit).unwrap()
}

fn world(columns: u32, rows: u32, cell_size: i32) -> World {
    World::new(WorldConfig::new(columns, rows, cell_size, 0)).unwrap()
}

/// A body that is group 0 and checks group 0.
fn solid<R: Resolver>(world: &mut World<R>, x: i32, y: i32, w: i32, h: i32, is_static: bool) -> BodyHandle {
    let handle = world.create_body(Vec2i::new(x, y), Vec2i::new(w, h), is_static);
    let body = world.body_mut(handle).unwrap();
    body.add_group(g(0));
    body.add_group_to_check(g(0));
    handle
}

fn counter() -> (Rc<Cell<u32>>, impl FnMut(&mut DetectionInfo)) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move |_: &mut DetectionInfo| c.set(c.get() + 1))
}

#[test]
fn bad_config_fails_fast() {
    assert!(matches!(
        World::new(WorldConfig::new(10, 10, 0, 0)),
        Err(WorldError::InvalidCellSize(0))
    ));
    assert!(World::with_resolver(WorldConfig::new(0, 3, 8, 0), Retro).is_err());
}

#[test]
fn deletion_is_deferred_to_next_update() {
    let mut w = world(10, 10, 10);
    let a = solid(&mut w, 50, 50, 10, 10, false);
    w.refresh();
    assert!(!w.grid().cells_containing(a).is_empty());

    assert!(w.del(a));
    assert!(w.is_pending_removal(a));
    assert!(w.body(a).is_some());
    assert_eq!(w.body_count(), 1);

    w.update(1.0 / 60.0);
    assert!(w.body(a).is_none());
    assert!(!w.is_pending_removal(a));
    assert_eq!(w.body_count(), 0);
    assert!(w.grid().cells_containing(a).is_empty());
    assert!(!w.del(a));
    assert!(matches!(w.try_body_mut(a), Err(WorldError::UnknownBody(h)) if h == a));
}

#[test]
fn non_resolving_body_is_left_alone() {
    let mut w = world(10, 10, 10);
    let a = solid(&mut w, 50, 47, 10, 10, false);
    let _floor = solid(&mut w, 50, 55, 100, 10, true);
    let (detections, on_detection) = counter();
    let resolutions = Rc::new(Cell::new(0));
    {
        let body = w.body_mut(a).unwrap();
        body.set_resolve(false);
        body.on_detection.subscribe(on_detection);
        let r = resolutions.clone();
        body.on_resolution.subscribe(move |_| r.set(r.get() + 1));
    }

    w.update(1.0 / 60.0);

    let body = w.body(a).unwrap();
    assert_eq!(body.position(), Vec2i::new(50, 47));
    assert_eq!(body.velocity(), Vec2f::zero());
    assert_eq!(detections.get(), 1);
    assert_eq!(resolutions.get(), 0);
    assert!(body.bodies_to_resolve().is_empty());
}

#[test]
fn static_bodies_never_integrate() {
    let mut w = world(10, 10, 10);
    let s = solid(&mut w, 30, 30, 10, 10, true);
    {
        let body = w.body_mut(s).unwrap();
        body.set_velocity(Vec2f::new(50.0, 50.0));
        body.set_acceleration(Vec2f::new(0.0, 100.0));
        body.set_mass(3.0);
    }
    for _ in 0..10 {
        w.update(0.1);
    }
    let body = w.body(s).unwrap();
    assert_eq!(body.position(), Vec2i::new(30, 30));
    assert_eq!(body.mass(), 0.0);
    assert_eq!(body.inv_mass(), 0.0);
}

#[test]
fn disjoint_groups_are_never_candidates() {
    let mut w = world(10, 10, 10);
    let a = w.create_body(Vec2i::new(50, 50), Vec2i::new(20, 20), true);
    let other_group = w.create_body(Vec2i::new(52, 50), Vec2i::new(10, 10), false);
    let same_group = w.create_body(Vec2i::new(48, 50), Vec2i::new(10, 10), false);
    w.body_mut(other_group).unwrap().add_group(g(2));
    w.body_mut(same_group).unwrap().add_group(g(1));

    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let body = w.body_mut(a).unwrap();
        body.add_group_to_check(g(1));
        let seen = seen.clone();
        body.on_detection.subscribe(move |info| seen.borrow_mut().push(info.other));
    }

    w.update(1.0 / 60.0);

    assert_eq!(*seen.borrow(), vec![same_group]);
    assert_eq!(w.body(a).unwrap().bodies_to_resolve(), &[same_group]);
}

#[test]
fn notifications_follow_the_step_order() {
    let mut w = world(10, 10, 10);
    let a = solid(&mut w, 50, 47, 10, 10, false);
    let _floor = solid(&mut w, 50, 55, 100, 10, true);
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let body = w.body_mut(a).unwrap();
        let l = log.clone();
        body.on_pre_update.subscribe(move |_| l.borrow_mut().push("pre"));
        let l = log.clone();
        body.on_detection.subscribe(move |_| l.borrow_mut().push("detect"));
        let l = log.clone();
        body.on_resolution.subscribe(move |_| l.borrow_mut().push("resolve"));
        let l = log.clone();
        body.on_post_update.subscribe(move |_| l.borrow_mut().push("post"));
    }

    w.update(1.0 / 60.0);

    assert_eq!(*log.borrow(), vec!["pre", "detect", "resolve", "post"]);
    // Pushed up out of the floor
    assert_eq!(w.body(a).unwrap().shape().bottom(), 50);
}

#[test]
fn leaving_the_grid_skips_the_next_step() {
    let mut w = world(10, 10, 10);
    let a = w.create_body(Vec2i::new(95, 50), Vec2i::new(4, 4), false);
    let fired = Rc::new(Cell::new(0));
    {
        let body = w.body_mut(a).unwrap();
        body.set_velocity(Vec2f::new(6.0, 0.0));
        let f = fired.clone();
        body.on_out_of_bounds.subscribe(move |_| f.set(f.get() + 1));
    }

    w.update(1.0);
    assert_eq!(fired.get(), 1);
    assert!(w.body(a).unwrap().is_out_of_bounds());
    assert_eq!(w.body(a).unwrap().position().x, 101);

    // Flag consumed, no movement
    w.update(1.0);
    assert_eq!(fired.get(), 1);
    assert!(!w.body(a).unwrap().is_out_of_bounds());
    assert_eq!(w.body(a).unwrap().position().x, 101);

    w.update(1.0);
    assert_eq!(fired.get(), 2);
    assert_eq!(w.body(a).unwrap().position().x, 107);
    // Still listed in the border cells
    assert!(w.grid().cell(Vec2i::new(9, 5)).contains(a));
}

#[test]
fn falling_box_comes_to_rest_on_the_floor() {
    let mut w = World::with_resolver(WorldConfig::new(20, 20, 16, 0), Retro).unwrap();
    let floor = w.create_body(Vec2i::new(160, 200), Vec2i::new(300, 20), true);
    w.body_mut(floor).unwrap().add_group(g(0));
    let b = solid(&mut w, 160, 100, 20, 20, false);
    w.body_mut(b).unwrap().set_acceleration(Vec2f::new(0.0, 500.0));

    for _ in 0..120 {
        w.update(1.0 / 60.0);
        assert!(w.body(b).unwrap().shape().bottom() <= 190);
    }
    assert_eq!(w.body(b).unwrap().shape().bottom(), 190);
    assert_eq!(w.body(floor).unwrap().position(), Vec2i::new(160, 200));
}

#[test]
fn grid_membership_tracks_moving_bodies() {
    let mut w = world(8, 8, 16);
    let a = w.create_body(Vec2i::new(20, 20), Vec2i::new(14, 30), false);
    w.body_mut(a).unwrap().set_velocity(Vec2f::new(37.0, 23.0));

    for step in 0..12 {
        w.update(0.25);
        if step == 6 {
            w.body_mut(a).unwrap().set_size(Vec2i::new(40, 6));
        }
        w.refresh();
        let shape = *w.body(a).unwrap().shape();
        let (range, _) = w.grid().span(&shape);
        let expected: Vec<Vec2i> = range.iter().collect();
        assert_eq!(w.grid().cells_containing(a), expected, "step {step}");
    }
}

#[test]
fn sensors_detect_without_pushing() {
    let mut w = world(10, 10, 10);
    let sensor = w.create_sensor(Vec2i::new(50, 50), Vec2i::new(20, 20));
    let d = solid(&mut w, 50, 50, 10, 10, false);
    w.body_mut(sensor).unwrap().add_group(g(0));
    let (sensed, on_detection) = counter();
    {
        let s = w.body_mut(sensor).unwrap();
        s.add_group_to_check(g(0));
        s.on_detection.subscribe(on_detection);
    }

    w.update(1.0 / 60.0);

    assert_eq!(sensed.get(), 1);
    assert_eq!(w.body(d).unwrap().position(), Vec2i::new(50, 50));
    assert!(w.body(d).unwrap().bodies_to_resolve().is_empty());
    assert!(w.body(sensor).unwrap().bodies_to_resolve().is_empty());
    assert!(w.body(sensor).unwrap().is_sensor());
}

#[test]
fn step_stats_count_the_pipeline() {
    let mut w = world(10, 10, 10);
    solid(&mut w, 50, 50, 10, 10, false);
    solid(&mut w, 55, 50, 10, 10, false);
    let gone = solid(&mut w, 10, 10, 4, 4, false);
    w.del(gone);

    assert_eq!(w.step_stats(), StepStats::default());
    w.enable_step_stats(true);
    w.update(1.0 / 60.0);

    let stats = w.step_stats();
    assert_eq!(stats.bodies_removed(), 1);
    assert_eq!(stats.bodies_updated(), 2);
    assert!(stats.detections() >= 1);
    assert!(stats.resolutions() >= 1);
    assert_eq!(stats.frame(), 1);
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(w.frame(), 1);
}

#[test]
fn queries_refresh_before_reading() {
    let mut w = world(10, 10, 10);
    let a = w.create_body(Vec2i::new(55, 5), Vec2i::new(4, 4), false);
    let _off = w.create_body(Vec2i::new(55, 55), Vec2i::new(4, 4), false);

    // Never updated: the query itself must link the bodies
    assert_eq!(w.query_ray(Vec2f::new(5.0, 5.0), Vec2f::new(1.0, 0.0)), Some(a));
    assert_eq!(w.query_point(Vec2f::new(56.0, 6.0)), vec![a]);
    assert_eq!(w.query_orthogonal(Vec2f::new(95.0, 5.0), Direction::Left), Some(a));
    assert_eq!(w.query_distance(Vec2f::new(40.0, 5.0), 15.0), vec![a]);
    assert_eq!(w.query_around(Vec2i::new(45, 5)), vec![a]);

    w.body_mut(a).unwrap().set_position(Vec2i::new(5, 95));
    let mut q = w.query(Vec2f::new(5.0, 95.0), Point);
    assert_eq!(q.next(), Some(a));
}

#[test]
fn facade_builds_from_json() {
    let config = r#"{ "columns": 10, "rows": 10, "cell_size": 10 }"#;
    assert!(matches!(
        CollisionWorld::from_json(config, "verlet"),
        Err(WorldError::UnknownResolver(name)) if name == "verlet"
    ));
    assert!(matches!(
        CollisionWorld::from_json("{ nope", "retro"),
        Err(WorldError::InvalidConfig(_))
    ));

    let mut world = CollisionWorld::from_json(config, "retro").unwrap();
    assert_eq!(world.resolver(), "retro");
    let id = world.create_body(50, 50, 10, 10, false);
    assert!(world.set_velocity(id, 60.0, 0.0));
    assert!(!world.add_group(id, 64));
    world.update(0.5);
    assert_eq!(world.position_x(id), Some(80));

    let snapshot: serde_json::Value = serde_json::from_str(&world.snapshot_json()).unwrap();
    assert_eq!(snapshot[0]["id"], id);
    assert_eq!(snapshot[0]["x"], 80);
    assert_eq!(snapshot[0]["static"], false);

    assert!(world.remove_body(id));
    world.update(0.5);
    assert_eq!(world.body_count(), 0);
    assert!(!world.set_velocity(id, 1.0, 1.0));
    assert_eq!(world.position_x(id), None);
}
