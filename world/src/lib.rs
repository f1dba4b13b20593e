#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generated terrain storage and reachability queries for Crystal Trail.

pub mod navigation;

use std::collections::BTreeMap;

use crystal_trail_core::{CellCoord, GridSize, TerrainCategory, TerrainCell};
use serde::{Deserialize, Serialize};

/// Rectangular, row-major grid of generated terrain cells.
///
/// Grids are built once by a generator and never mutated afterwards; a new
/// level replaces the whole grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    size: GridSize,
    cells: Vec<TerrainCell>,
}

impl TerrainGrid {
    /// Builds a grid by evaluating `cell_at` for every coordinate in row-major order.
    #[must_use]
    pub fn from_fn<F>(size: GridSize, mut cell_at: F) -> Self
    where
        F: FnMut(CellCoord) -> TerrainCell,
    {
        let mut cells = Vec::with_capacity(size.cell_count());
        for cell in size.cells() {
            cells.push(cell_at(cell));
        }

        Self { size, cells }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Cell stored at the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&TerrainCell> {
        self.size
            .index(coord)
            .and_then(|offset| self.cells.get(offset))
    }

    /// Reports whether the coordinate lies inside the grid on a walkable cell.
    #[must_use]
    pub fn is_walkable(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(TerrainCell::walkable)
    }

    /// Iterates every coordinate together with its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &TerrainCell)> {
        self.size.cells().zip(self.cells.iter())
    }

    /// Collapses every cell to its legacy category name, one vector per row.
    #[must_use]
    pub fn category_names(&self) -> Vec<Vec<&'static str>> {
        let width = usize::try_from(self.width()).unwrap_or(usize::MAX).max(1);
        self.cells
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.category().name()).collect())
            .collect()
    }

    /// Counts how many cells fall into each terrain category.
    #[must_use]
    pub fn census(&self) -> BTreeMap<TerrainCategory, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.category()).or_insert(0) += 1;
        }
        counts
    }
}
