//! Cells eligible to hold a collectible or the target.

use std::collections::HashSet;

use crystal_trail_core::{CellCoord, GridSize};

use crate::LayoutOptions;

/// Every cell other than `start` that the placement policy leaves open, in
/// row-major order.
pub(crate) fn candidate_cells(
    size: GridSize,
    start: CellCoord,
    options: &LayoutOptions,
) -> Vec<CellCoord> {
    let last_row = size.height().saturating_sub(1);
    let forbidden: HashSet<CellCoord> = options.forbidden.iter().copied().collect();

    size.cells()
        .filter(|&cell| cell != start)
        .filter(|cell| !(options.reserve_last_row && cell.row() == last_row))
        .filter(|&cell| {
            !(options.keep_start_neighbors_clear && cell.manhattan_distance(start) == 1)
        })
        .filter(|cell| !forbidden.contains(cell))
        .collect()
}
