//! Coarse biome partitioning and per-biome terrain rules.

use crystal_trail_core::{Biome, CellCoord, GridSize, TerrainCategory};
use rand::Rng;

/// Biome labels assigned to square blocks of `block_size` cells.
#[derive(Clone, Debug)]
pub(crate) struct BiomeMap {
    size: GridSize,
    block_size: u32,
    blocks_wide: u32,
    labels: Vec<Biome>,
}

impl BiomeMap {
    /// Draws a uniformly random biome for every block covering `size`.
    pub(crate) fn generate<R>(size: GridSize, block_size: u32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        debug_assert!(block_size > 0, "biome blocks must span at least one cell");
        let blocks_wide = size.width().div_ceil(block_size);
        let blocks_high = size.height().div_ceil(block_size);
        let block_count = usize::try_from(blocks_wide)
            .unwrap_or(0)
            .saturating_mul(usize::try_from(blocks_high).unwrap_or(0));

        let labels = (0..block_count)
            .map(|_| Biome::ALL[rng.gen_range(0..Biome::ALL.len())])
            .collect();

        Self {
            size,
            block_size,
            blocks_wide,
            labels,
        }
    }

    /// Biome of the block containing the cell.
    pub(crate) fn biome_at(&self, cell: CellCoord) -> Biome {
        let block_column = cell.column() / self.block_size;
        let block_row = cell.row() / self.block_size;
        let offset = u64::from(block_row) * u64::from(self.blocks_wide) + u64::from(block_column);
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.labels.get(offset))
            .copied()
            .unwrap_or(Biome::Grassland)
    }

    /// Reports whether any cell within Chebyshev `radius` of `cell` belongs to
    /// a different biome.
    pub(crate) fn borders_other_biome(&self, cell: CellCoord, radius: u32) -> bool {
        if radius == 0 {
            return false;
        }

        let own = self.biome_at(cell);
        let first_column = cell.column().saturating_sub(radius);
        let last_column = cell
            .column()
            .saturating_add(radius)
            .min(self.size.width().saturating_sub(1));
        let first_row = cell.row().saturating_sub(radius);
        let last_row = cell
            .row()
            .saturating_add(radius)
            .min(self.size.height().saturating_sub(1));

        (first_row..=last_row).any(|row| {
            (first_column..=last_column)
                .any(|column| self.biome_at(CellCoord::new(column, row)) != own)
        })
    }
}

/// Maps a smooth value in `[0, 1]` onto the category a biome produces there.
pub(crate) fn category_for(biome: Biome, value: f64) -> TerrainCategory {
    match biome {
        Biome::Grassland => {
            if value < 0.18 {
                TerrainCategory::Water
            } else if value > 0.82 {
                TerrainCategory::Tree
            } else if value > 0.72 {
                TerrainCategory::Bush
            } else {
                TerrainCategory::Ground
            }
        }
        Biome::Wetland => {
            if value < 0.42 {
                TerrainCategory::Water
            } else if value > 0.80 {
                TerrainCategory::Bush
            } else {
                TerrainCategory::Ground
            }
        }
        Biome::Frozen => {
            if value < 0.20 {
                TerrainCategory::Water
            } else if value < 0.55 {
                TerrainCategory::Ice
            } else if value > 0.90 {
                TerrainCategory::Crystal
            } else {
                TerrainCategory::Ground
            }
        }
        Biome::Volcanic => {
            if value < 0.30 {
                TerrainCategory::Lava
            } else if value > 0.93 {
                TerrainCategory::Crystal
            } else if value > 0.78 {
                TerrainCategory::Rock
            } else {
                TerrainCategory::Dirt
            }
        }
        Biome::Rocky => {
            if value > 0.92 {
                TerrainCategory::Crystal
            } else if value < 0.25 || value > 0.75 {
                TerrainCategory::Rock
            } else {
                TerrainCategory::Ground
            }
        }
    }
}
