//! Two-point reachability over generated terrain.

use std::collections::VecDeque;

use crystal_trail_core::{CellCoord, GridSize};

use crate::TerrainGrid;

/// Reports whether `target` can be reached from `start` by orthogonal steps
/// across walkable cells of the grid.
#[must_use]
pub fn is_reachable(grid: &TerrainGrid, start: CellCoord, target: CellCoord) -> bool {
    is_reachable_with(grid.size(), start, target, |cell| grid.is_walkable(cell))
}

/// Breadth-first reachability check driven by an arbitrary walkability predicate.
///
/// Both endpoints must lie inside the grid and be walkable. Each cell is
/// enqueued at most once, so the search is bounded by the cell count of
/// `size`. The search stops as soon as `target` is discovered.
pub fn is_reachable_with<F>(
    size: GridSize,
    start: CellCoord,
    target: CellCoord,
    mut is_walkable: F,
) -> bool
where
    F: FnMut(CellCoord) -> bool,
{
    if !size.contains(start) || !size.contains(target) {
        return false;
    }

    if !is_walkable(start) || !is_walkable(target) {
        return false;
    }

    if start == target {
        return true;
    }

    let Some(start_index) = size.index(start) else {
        return false;
    };

    let mut visited = vec![false; size.cell_count()];
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for neighbor in neighbors(cell, size) {
            let Some(index) = size.index(neighbor) else {
                continue;
            };

            if visited[index] {
                continue;
            }
            visited[index] = true;

            if !is_walkable(neighbor) {
                continue;
            }

            if neighbor == target {
                return true;
            }

            queue.push_back(neighbor);
        }
    }

    false
}

fn neighbors(cell: CellCoord, size: GridSize) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < size.width() {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < size.height() {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
