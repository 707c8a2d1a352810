//! Grid - uniform cells over world space, each listing the bodies it overlaps
//!
//! Layout is fixed at construction (columns x rows of `cell_size` units,
//! shifted by `offset` cells). Cells are stored row-major in one Vec.
//!
//! Cells never own bodies: they hold `BodyHandle`s into the world's arena.

use std::collections::BTreeMap;

use crate::core::Vec2i;
use crate::domain::config::WorldConfig;
use crate::domain::error::WorldError;
use crate::domain::groups::{Group, GroupSet};
use crate::domain::handle::BodyHandle;

mod indexing;
mod membership;

pub use indexing::CellRange;
pub use membership::SpatialInfo;

/// Bodies currently overlapping one cell.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    bodies: Vec<BodyHandle>,
    // Per-group index for grouped queries
    grouped: BTreeMap<Group, Vec<BodyHandle>>,
}

impl Cell {
    /// Bodies in the order they entered the cell.
    pub fn bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    pub fn bodies_in_group(&self, group: Group) -> &[BodyHandle] {
        self.grouped.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(&handle)
    }

    fn insert(&mut self, handle: BodyHandle, groups: GroupSet) {
        self.bodies.push(handle);
        for group in groups.iter() {
            self.grouped.entry(group).or_default().push(handle);
        }
    }

    fn remove(&mut self, handle: BodyHandle, groups: GroupSet) {
        self.bodies.retain(|h| *h != handle);
        for group in groups.iter() {
            if let Some(list) = self.grouped.get_mut(&group) {
                list.retain(|h| *h != handle);
                if list.is_empty() {
                    self.grouped.remove(&group);
                }
            }
        }
    }
}

pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: i32,
    offset: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fails on a non-positive cell size or an empty layout.
    pub fn new(columns: u32, rows: u32, cell_size: i32, offset: i32) -> Result<Self, WorldError> {
        Self::from_config(&WorldConfig::new(columns, rows, cell_size, offset))
    }

    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let size = config.columns as usize * config.rows as usize;
        Ok(Self {
            columns: config.columns,
            rows: config.rows,
            cell_size: config.cell_size,
            offset: config.offset,
            cells: vec![Cell::default(); size],
        })
    }

    // === Dimensions ===
    #[inline]
    pub fn columns(&self) -> u32 { self.columns }

    #[inline]
    pub fn rows(&self) -> u32 { self.rows }

    #[inline]
    pub fn cell_size(&self) -> i32 { self.cell_size }

    #[inline]
    pub fn offset(&self) -> i32 { self.offset }

    #[inline]
    pub fn cell_count(&self) -> usize { self.cells.len() }

    /// Cell at `index`; out-of-range indices clamp to the border cell.
    pub fn cell(&self, index: Vec2i) -> &Cell {
        let i = self.linear(self.clamp_index(index));
        fast!(self.cells, [i])
    }

    /// Every cell index currently listing `handle`, row-major.
    pub fn cells_containing(&self, handle: BodyHandle) -> Vec<Vec2i> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.contains(handle))
            .map(|(i, _)| self.coords(i))
            .collect()
    }

    fn cell_mut(&mut self, index: Vec2i) -> &mut Cell {
        let i = self.linear(self.clamp_index(index));
        fast!(mut self.cells, [i])
    }
}

#[cfg(test)]
mod tests;
