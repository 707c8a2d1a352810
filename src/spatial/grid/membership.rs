//! Lazy cell membership
//!
//! Shape and group setters only flip `dirty`; the grid catches up in one
//! `sync` before the next query, however many setters ran in between.

use crate::core::Aabb;
use crate::domain::groups::GroupSet;
use crate::domain::handle::BodyHandle;

use super::{CellRange, Grid};

/// Where a body is recorded in the grid.
#[derive(Clone, Copy, Debug)]
pub struct SpatialInfo {
    range: Option<CellRange>,
    indexed_groups: GroupSet,
    dirty: bool,
}

impl SpatialInfo {
    pub fn new() -> Self {
        Self {
            range: None,
            indexed_groups: GroupSet::EMPTY,
            dirty: true,
        }
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cells the body was last recorded in (`None` before the first sync).
    pub fn range(&self) -> Option<CellRange> {
        self.range
    }
}

impl Default for SpatialInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Move a body's record to the cells `shape` spans now.
    ///
    /// Only the cells that changed are touched, unless the body's groups
    /// changed too (then every grouped index entry has to be rewritten).
    /// Returns true when the shape reaches outside the grid.
    pub(crate) fn sync(&mut self, handle: BodyHandle, shape: &Aabb, groups: GroupSet, info: &mut SpatialInfo) -> bool {
        let (next, out_of_bounds) = self.span(shape);
        match info.range {
            Some(prev) if info.indexed_groups == groups => {
                if prev != next {
                    for idx in prev.iter().filter(|i| !next.contains(*i)) {
                        self.cell_mut(idx).remove(handle, groups);
                    }
                    for idx in next.iter().filter(|i| !prev.contains(*i)) {
                        self.cell_mut(idx).insert(handle, groups);
                    }
                }
            }
            prev => {
                if let Some(prev) = prev {
                    for idx in prev.iter() {
                        self.cell_mut(idx).remove(handle, info.indexed_groups);
                    }
                }
                for idx in next.iter() {
                    self.cell_mut(idx).insert(handle, groups);
                }
            }
        }
        info.range = Some(next);
        info.indexed_groups = groups;
        info.dirty = false;
        out_of_bounds
    }

    /// Drop every cell entry for the body.
    pub(crate) fn unlink(&mut self, handle: BodyHandle, info: &mut SpatialInfo) {
        if let Some(prev) = info.range.take() {
            for idx in prev.iter() {
                self.cell_mut(idx).remove(handle, info.indexed_groups);
            }
        }
        info.indexed_groups = GroupSet::EMPTY;
        info.dirty = true;
    }
}
