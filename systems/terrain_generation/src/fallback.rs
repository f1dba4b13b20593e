//! Guaranteed-path terrain used once biome generation keeps failing.

use std::collections::HashSet;

use crystal_trail_core::{Biome, CellCoord, GridSize, TerrainCategory, TerrainCell, TileKey};
use crystal_trail_world::TerrainGrid;
use rand::Rng;

const FALLBACK_BIOME: Biome = Biome::Grassland;

/// Ground-filled grid with an L-shaped corridor from `start` to `target`.
///
/// Cells off the corridor become rock or water with `obstacle_probability`.
pub(crate) fn corridor_grid<R>(
    size: GridSize,
    start: CellCoord,
    target: CellCoord,
    obstacle_probability: f64,
    rng: &mut R,
) -> TerrainGrid
where
    R: Rng + ?Sized,
{
    let corridor = l_corridor(start, target);

    TerrainGrid::from_fn(size, |cell| {
        if corridor.contains(&cell) || !rng.gen_bool(obstacle_probability) {
            return TerrainCell::ground(FALLBACK_BIOME);
        }

        let category = if rng.gen_bool(0.5) {
            TerrainCategory::Rock
        } else {
            TerrainCategory::Water
        };
        TerrainCell::new(category, TileKey::new(FALLBACK_BIOME, category, 0))
    })
}

/// Cells of the single-bend path that runs along the start row, then down
/// (or up) the target column.
pub(crate) fn l_corridor(start: CellCoord, target: CellCoord) -> HashSet<CellCoord> {
    let mut cells = HashSet::new();

    let (first_column, last_column) = ordered(start.column(), target.column());
    for column in first_column..=last_column {
        let _ = cells.insert(CellCoord::new(column, start.row()));
    }

    let (first_row, last_row) = ordered(start.row(), target.row());
    for row in first_row..=last_row {
        let _ = cells.insert(CellCoord::new(target.column(), row));
    }

    cells
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
