//! Smooth per-cell values derived from coordinates rather than a random stream.

use std::fmt;

use crystal_trail_core::CellCoord;
use noise::{NoiseFn, Perlin};

const COARSE_FREQUENCY: f64 = 0.23;
const FINE_FREQUENCY: f64 = 0.61;
const FINE_WEIGHT: f64 = 0.5;
const CONTRAST: f64 = 1.8;
const TILE_VARIANTS: u32 = 4;

/// Two-octave Perlin sampler evaluated at cell centres.
pub(crate) struct CellNoise {
    seed: u32,
    coarse: Perlin,
    fine: Perlin,
}

impl CellNoise {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            seed,
            coarse: Perlin::new(seed),
            fine: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Value in `[0, 1]` for the cell; identical inputs always agree.
    pub(crate) fn sample(&self, cell: CellCoord) -> f64 {
        // Perlin noise is zero on integer lattice points, so sample cell centres.
        let x = f64::from(cell.column()) + 0.5;
        let y = f64::from(cell.row()) + 0.5;

        let coarse = self.coarse.get([x * COARSE_FREQUENCY, y * COARSE_FREQUENCY]);
        let fine = self.fine.get([x * FINE_FREQUENCY, y * FINE_FREQUENCY]) * FINE_WEIGHT;
        let combined = (coarse + fine) / (1.0 + FINE_WEIGHT);

        (combined * CONTRAST).clamp(-1.0, 1.0) * 0.5 + 0.5
    }

    /// Art variant picked from a sampled value.
    pub(crate) fn variant(value: f64) -> u8 {
        let scaled = (value.clamp(0.0, 1.0) * 1_000.0) as u32;
        (scaled % TILE_VARIANTS) as u8
    }
}

impl fmt::Debug for CellNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellNoise").field("seed", &self.seed).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_unit_interval() {
        let noise = CellNoise::new(9);
        for row in 0..40 {
            for column in 0..40 {
                let value = noise.sample(CellCoord::new(column, row));
                assert!((0.0..=1.0).contains(&value), "{value} out of range");
            }
        }
    }

    #[test]
    fn samples_depend_only_on_seed_and_coordinates() {
        let first = CellNoise::new(42);
        let second = CellNoise::new(42);
        let cell = CellCoord::new(13, 7);
        assert_eq!(first.sample(cell), second.sample(cell));
    }

    #[test]
    fn samples_vary_across_the_grid() {
        let noise = CellNoise::new(1);
        let values: Vec<f64> = (0..20)
            .map(|column| noise.sample(CellCoord::new(column, 3)))
            .collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.05, "noise should not be flat: {min}..{max}");
    }

    #[test]
    fn variants_stay_within_tileset() {
        for step in 0..=100 {
            assert!(u32::from(CellNoise::variant(f64::from(step) / 100.0)) < TILE_VARIANTS);
        }
    }
}
