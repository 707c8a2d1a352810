pub mod grid;
pub mod query;

pub use grid::{Cell, CellRange, Grid, SpatialInfo};
pub use query::{Area, Direction, Distance, GridQuery, Orthogonal, Point, QueryState, RayCast, Sorting, Traversal};
