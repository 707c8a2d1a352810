use super::*;
use crate::core::Aabb;

fn handle(i: u32) -> BodyHandle {
    BodyHandle::new(i, 0)
}

/// Cells whose half-open bounds intersect the closed shape.
fn expected_cells(grid: &Grid, shape: &Aabb) -> Vec<Vec2i> {
    let cs = grid.cell_size();
    let mut out = Vec::new();
    for y in 0..grid.rows() as i32 {
        for x in 0..grid.columns() as i32 {
            let o = grid.cell_origin(Vec2i::new(x, y));
            let hit_x = shape.left() < o.x + cs && shape.right() >= o.x;
            let hit_y = shape.top() < o.y + cs && shape.bottom() >= o.y;
            if hit_x && hit_y {
                out.push(Vec2i::new(x, y));
            }
        }
    }
    out
}

#[test]
fn rejects_bad_layouts() {
    assert!(matches!(Grid::new(4, 4, 0, 0), Err(WorldError::InvalidCellSize(0))));
    assert!(matches!(Grid::new(0, 4, 8, 0), Err(WorldError::InvalidDimensions { .. })));
    assert!(Grid::new(4, 4, -3, 0).is_err());
}

#[test]
fn index_clamps_to_border() {
    let grid = Grid::new(10, 5, 10, 0).unwrap();
    assert_eq!(grid.index(Vec2i::new(15, 15)), Vec2i::new(1, 1));
    assert_eq!(grid.index(Vec2i::new(-1, -1)), Vec2i::new(0, 0));
    assert_eq!(grid.raw_index(Vec2i::new(-1, -1)), Vec2i::new(-1, -1));
    assert_eq!(grid.index(Vec2i::new(5000, 49)), Vec2i::new(9, 4));
    assert_eq!(grid.index(Vec2i::new(5000, 50)), Vec2i::new(9, 4));
}

#[test]
fn offset_shifts_negative_space_into_grid() {
    let grid = Grid::new(10, 10, 10, 5).unwrap();
    assert_eq!(grid.index(Vec2i::new(-50, -1)), Vec2i::new(0, 4));
    assert_eq!(grid.index(Vec2i::new(0, 0)), Vec2i::new(5, 5));
    assert_eq!(grid.cell_origin(Vec2i::new(0, 0)), Vec2i::new(-50, -50));
}

#[test]
fn span_reports_out_of_bounds() {
    let grid = Grid::new(4, 4, 10, 0).unwrap();
    let inside = Aabb::new(Vec2i::new(15, 15), Vec2i::new(2, 2));
    let (range, oob) = grid.span(&inside);
    assert!(!oob);
    assert_eq!(range, CellRange::new(Vec2i::new(1, 1), Vec2i::new(1, 1)));

    let leaking = Aabb::new(Vec2i::new(38, 5), Vec2i::new(5, 2));
    let (range, oob) = grid.span(&leaking);
    assert!(oob);
    assert_eq!(range.end.x, 3);
}

#[test]
fn membership_tracks_moves_and_resizes() {
    let mut grid = Grid::new(8, 8, 10, 0).unwrap();
    let h = handle(0);
    let mut info = SpatialInfo::new();

    let moves: &[(Vec2i, Vec2i)] = &[
        (Vec2i::new(5, 5), Vec2i::new(3, 3)),
        (Vec2i::new(20, 5), Vec2i::new(3, 3)),
        (Vec2i::new(20, 20), Vec2i::new(10, 10)),
        (Vec2i::new(20, 20), Vec2i::new(0, 0)),
        (Vec2i::new(39, 41), Vec2i::new(1, 1)),
        (Vec2i::new(10, 10), Vec2i::new(0, 0)),
        (Vec2i::new(55, 15), Vec2i::new(25, 5)),
    ];

    for (pos, half) in moves {
        let shape = Aabb::new(*pos, *half);
        info.invalidate();
        grid.sync(h, &shape, GroupSet::EMPTY, &mut info);
        assert_eq!(grid.cells_containing(h), expected_cells(&grid, &shape), "{:?}", shape);
    }

    grid.unlink(h, &mut info);
    assert!(grid.cells_containing(h).is_empty());
    assert!(info.is_dirty());
}

#[test]
fn grouped_index_follows_group_changes() {
    let mut grid = Grid::new(4, 4, 10, 0).unwrap();
    let h = handle(3);
    let g1 = Group::new(1).unwrap();
    let g2 = Group::new(2).unwrap();
    let shape = Aabb::new(Vec2i::new(5, 5), Vec2i::new(1, 1));
    let mut info = SpatialInfo::new();

    grid.sync(h, &shape, GroupSet::from(g1), &mut info);
    assert_eq!(grid.cell(Vec2i::zero()).bodies_in_group(g1), &[h]);

    info.invalidate();
    grid.sync(h, &shape, GroupSet::from(g2), &mut info);
    assert!(grid.cell(Vec2i::zero()).bodies_in_group(g1).is_empty());
    assert_eq!(grid.cell(Vec2i::zero()).bodies_in_group(g2), &[h]);
    assert_eq!(grid.cell(Vec2i::zero()).bodies(), &[h]);
}
