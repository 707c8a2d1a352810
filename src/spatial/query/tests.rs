use super::*;
use crate::domain::body::Body;

struct Scene {
    grid: Grid,
    bodies: Bodies<()>,
}

impl Scene {
    fn new(columns: u32, rows: u32, cell_size: i32) -> Self {
        Self {
            grid: Grid::new(columns, rows, cell_size, 0).unwrap(),
            bodies: Bodies::new(),
        }
    }

    fn place(&mut self, x: i32, y: i32, hx: i32, hy: i32) -> BodyHandle {
        self.place_in(x, y, hx, hy, None)
    }

    fn place_in(&mut self, x: i32, y: i32, hx: i32, hy: i32, group: Option<Group>) -> BodyHandle {
        let mut body = Body::new(Vec2i::new(x, y), Vec2i::new(hx * 2, hy * 2), false);
        if let Some(g) = group {
            body.add_group(g);
        }
        let h = self.bodies.insert(body);
        let body = self.bodies.get_mut(h).unwrap();
        let shape = *body.shape();
        let groups = body.groups().groups();
        self.grid.sync(h, &shape, groups, &mut body.spatial);
        h
    }

    fn query<T: Traversal>(&self, x: f32, y: f32, traversal: T) -> GridQuery<'_, (), T> {
        GridQuery::new(&self.grid, &self.bodies, Vec2f::new(x, y), traversal)
    }
}

fn drain<I, T: Traversal>(q: &mut GridQuery<'_, I, T>) -> Vec<BodyHandle> {
    let mut out = Vec::new();
    while let Some(h) = q.next() {
        out.push(h);
    }
    out
}

#[test]
fn raycast_finds_body_on_its_row_only() {
    let mut s = Scene::new(10, 10, 10);
    let target = s.place(55, 5, 2, 2);
    let _off_path = s.place(55, 55, 2, 2);
    // In a crossed cell, but the ray passes above it
    let _grazed = s.place(35, 8, 1, 1);

    let mut q = s.query(5.0, 5.0, RayCast::new(Vec2f::new(1.0, 0.0)));
    assert_eq!(q.next(), Some(target));
    assert_eq!(q.last_pos(), Some(Vec2i::new(5, 0)));
    assert_eq!(q.next(), None);
    assert!(q.visited_indexes().iter().all(|c| c.y == 0));
    assert_eq!(q.visited_indexes().len(), 10);
}

#[test]
fn raycast_returns_nearest_first_within_a_cell() {
    let mut s = Scene::new(2, 2, 100);
    let far = s.place(60, 10, 2, 2);
    let near = s.place(30, 10, 2, 2);
    let mut q = s.query(5.0, 10.0, RayCast::new(Vec2f::new(1.0, 0.0)));
    assert_eq!(drain(&mut q), vec![near, far]);
}

#[test]
fn raycast_respects_step_budget() {
    let mut s = Scene::new(10, 10, 10);
    s.place(55, 5, 2, 2);
    let mut q = s.query(5.0, 5.0, RayCast::with_max_steps(Vec2f::new(1.0, 0.0), 2));
    assert_eq!(q.next(), None);
    assert_eq!(q.visited_indexes(), &[Vec2i::new(0, 0), Vec2i::new(1, 0), Vec2i::new(2, 0)]);
}

#[test]
fn raycast_diagonal_walk_is_connected() {
    let s = Scene::new(10, 10, 10);
    let mut q = s.query(5.0, 5.0, RayCast::new(Vec2f::new(1.0, 1.0)));
    let cells = q.all_cells();
    assert_eq!(cells.first(), Some(&Vec2i::new(0, 0)));
    assert_eq!(cells.last(), Some(&Vec2i::new(9, 9)));
    for pair in cells.windows(2) {
        let d = (pair[1] - pair[0]).abs();
        assert_eq!(d.x + d.y, 1, "{:?} -> {:?}", pair[0], pair[1]);
    }
}

#[test]
fn raycast_from_outside_visits_nothing() {
    let mut s = Scene::new(10, 10, 10);
    s.place(5, 5, 2, 2);
    let mut q = s.query(-50.0, 5.0, RayCast::new(Vec2f::new(1.0, 0.0)));
    assert_eq!(q.next(), None);
    assert!(q.visited_indexes().is_empty());
}

#[test]
fn point_needs_containment() {
    let mut s = Scene::new(10, 10, 10);
    let b = s.place(25, 25, 5, 5);
    assert_eq!(s.query(22.0, 22.0, Point).next(), Some(b));
    assert_eq!(s.query(30.0, 30.0, Point).next(), Some(b));
    assert_eq!(s.query(31.0, 31.0, Point).next(), None);
}

#[test]
fn around_returns_multi_cell_body_once() {
    let mut s = Scene::new(10, 10, 10);
    let b = s.place(25, 25, 5, 5);
    let mut q = s.query(25.0, 25.0, Area::around());
    assert_eq!(drain(&mut q), vec![b]);
    assert_eq!(q.visited_indexes().len(), 9);
}

#[test]
fn around_clips_at_the_corner() {
    let s = Scene::new(10, 10, 10);
    let mut q = s.query(0.0, 0.0, Area::around());
    assert_eq!(
        q.all_cells(),
        vec![Vec2i::new(0, 0), Vec2i::new(1, 0), Vec2i::new(0, 1), Vec2i::new(1, 1)]
    );
    assert_eq!(q.next(), None);
}

#[test]
fn orthogonal_skips_bodies_behind_the_start() {
    let mut s = Scene::new(10, 10, 10);
    let e = s.place(20, 5, 2, 2);
    let ahead = s.place(75, 5, 2, 2);

    let mut right = s.query(25.0, 5.0, Orthogonal::new(Direction::Right));
    assert_eq!(drain(&mut right), vec![ahead]);

    let mut left = s.query(25.0, 5.0, Orthogonal::new(Direction::Left));
    assert_eq!(drain(&mut left), vec![e]);
}

#[test]
fn orthogonal_ignores_bodies_beside_the_line() {
    let mut s = Scene::new(10, 10, 10);
    // Same cell row as the start, but spans y 7..9 while the line runs at y = 2
    let _beside = s.place(55, 8, 1, 1);
    let crossed = s.place(75, 3, 1, 1);

    let mut right = s.query(5.0, 2.0, Orthogonal::new(Direction::Right));
    assert_eq!(drain(&mut right), vec![crossed]);

    let _left_of_column = s.place(3, 45, 1, 1);
    let mut down = s.query(8.0, 5.0, Orthogonal::new(Direction::Down));
    assert_eq!(drain(&mut down), Vec::<BodyHandle>::new());
}

#[test]
fn line_queries_report_where_they_hit() {
    let mut s = Scene::new(10, 10, 10);
    let target = s.place(55, 5, 2, 2);

    let mut q = s.query(5.0, 5.0, Orthogonal::new(Direction::Right));
    assert_eq!(q.next(), Some(target));
    assert_eq!(q.last_hit(), Some(Vec2f::new(53.0, 5.0)));

    let mut q = s.query(5.0, 5.0, RayCast::new(Vec2f::new(1.0, 0.0)));
    assert_eq!(q.next(), Some(target));
    assert_eq!(q.last_hit(), Some(Vec2f::new(53.0, 5.0)));

    let mut q = s.query(54.0, 6.0, Area::around());
    assert_eq!(q.next(), Some(target));
    assert_eq!(q.last_hit(), None);
    q.reset();
    assert_eq!(q.last_hit(), None);
}

#[test]
fn orthogonal_walks_to_the_border() {
    let s = Scene::new(10, 10, 10);
    let mut q = s.query(5.0, 75.0, Orthogonal::new(Direction::Down));
    assert_eq!(q.all_cells(), vec![Vec2i::new(0, 7), Vec2i::new(0, 8), Vec2i::new(0, 9)]);
}

#[test]
fn distance_stops_after_last_reachable_ring() {
    let mut s = Scene::new(10, 10, 10);
    let near = s.place(18, 5, 2, 2);
    let _just_out = s.place(25, 5, 2, 2);
    let _far = s.place(95, 95, 2, 2);

    let mut q = s.query(5.0, 5.0, Distance::new(15.0));
    assert_eq!(drain(&mut q), vec![near]);
    // rings 0, 1 and 2 clipped to the corner: 1 + 3 + 5
    assert_eq!(q.visited_indexes().len(), 9);
}

#[test]
fn reset_rewinds_traversal_state() {
    let mut s = Scene::new(10, 10, 10);
    let near = s.place(18, 5, 2, 2);
    let mut q = s.query(5.0, 5.0, Distance::new(15.0));
    assert_eq!(q.next(), Some(near));
    assert_eq!(q.next(), None);
    q.reset();
    assert_eq!(q.traversal().ring(), 0);
    assert_eq!(q.next(), Some(near));
    assert!(q.visited_indexes().len() <= 9);
}

#[test]
fn stop_ends_the_walk() {
    let mut s = Scene::new(10, 10, 10);
    s.place(5, 5, 2, 2);
    s.place(15, 5, 2, 2);
    let mut q = s.query(5.0, 5.0, Area::around());
    assert!(q.next().is_some());
    q.stop();
    assert_eq!(q.next(), None);
    assert!(q.state().is_out());
}

#[test]
fn grouped_lookup_uses_the_group_index() {
    let mut s = Scene::new(10, 10, 10);
    let g = Group::new(3).unwrap();
    let _plain = s.place(5, 5, 2, 2);
    let tagged = s.place_in(6, 6, 2, 2, Some(g));
    let mut q = s.query(5.0, 5.0, Area::around());
    assert_eq!(q.next_in_group(g), Some(tagged));
    assert_eq!(q.next_in_group(g), None);
}
