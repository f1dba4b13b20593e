#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Biome-based terrain synthesis for the Crystal Trail open world.
//!
//! Generation partitions the grid into square biome blocks, fills each cell
//! from its biome's rule using a smooth coordinate-driven value, marks cells
//! near a biome boundary as shoreline, and finally forces the start and target
//! cells to ground. When a path is required the result is validated with
//! [`crystal_trail_world::navigation::is_reachable`] and regenerated a bounded
//! number of times before a corridor layout that is connected by construction
//! is substituted.

mod biomes;
mod cell_noise;
mod fallback;

use crystal_trail_core::{
    retry::{retry_or_fallback, Resolution, Retried},
    CellCoord, ConfigurationIssue, GenerationError, GridSize, TerrainCategory, TerrainCell,
    TileKey,
};
use crystal_trail_world::{navigation::is_reachable, TerrainGrid};
use log::{info, warn};
use rand::Rng;
use serde::Deserialize;

use crate::{
    biomes::{category_for, BiomeMap},
    cell_noise::CellNoise,
};

/// Default number of biome attempts before the corridor fallback is used.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Seed of the coordinate noise used when none is configured.
pub const DEFAULT_NOISE_SEED: u32 = 0x5eed_7e11;

/// Tuning knobs controlling terrain generation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainOptions {
    /// Edge length, in cells, of the square blocks that share one biome.
    pub biome_size: u32,
    /// Whether cells near a different biome become shoreline.
    pub use_transitions: bool,
    /// Chebyshev radius searched for a different biome.
    pub transition_width: u32,
    /// Whether the start and target must be mutually reachable.
    pub ensure_path: bool,
    /// Biome generations tried before falling back to the corridor layout.
    pub max_attempts: u32,
    /// Chance that a cell off the fallback corridor becomes an obstacle.
    pub obstacle_probability: f64,
    /// Seed of the coordinate noise; identical seeds give identical terrain
    /// for identical biome labels.
    pub noise_seed: u32,
}

impl Default for TerrainOptions {
    fn default() -> Self {
        Self {
            biome_size: 3,
            use_transitions: true,
            transition_width: 1,
            ensure_path: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            obstacle_probability: 0.2,
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }
}

impl TerrainOptions {
    fn validate(&self) -> Result<(), GenerationError> {
        if self.biome_size == 0 {
            return Err(ConfigurationIssue::ZeroBiomeSize.into());
        }

        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(ConfigurationIssue::ObstacleProbability(self.obstacle_probability).into());
        }

        Ok(())
    }
}

/// Pure system that produces terrain grids for open-world levels.
#[derive(Debug)]
pub struct TerrainGenerator {
    options: TerrainOptions,
    noise: CellNoise,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self::new(TerrainOptions::default())
    }
}

impl TerrainGenerator {
    /// Creates a generator using the provided options.
    #[must_use]
    pub fn new(options: TerrainOptions) -> Self {
        let noise = CellNoise::new(options.noise_seed);
        Self { options, noise }
    }

    /// Options the generator was configured with.
    #[must_use]
    pub fn options(&self) -> &TerrainOptions {
        &self.options
    }

    /// Generates a `width` x `height` grid with walkable `start` and `target`.
    ///
    /// With `ensure_path` enabled the returned grid always connects `start`
    /// and `target`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] when the grid is
    /// empty, an endpoint lies outside it, or the options are out of range.
    pub fn generate<R>(
        &self,
        width: u32,
        height: u32,
        start: CellCoord,
        target: CellCoord,
        rng: &mut R,
    ) -> Result<TerrainGrid, GenerationError>
    where
        R: Rng + ?Sized,
    {
        self.generate_traced(width, height, start, target, rng)
            .map(Retried::into_inner)
    }

    /// Same as [`TerrainGenerator::generate`], also reporting whether the
    /// biome result was accepted or the corridor fallback was used.
    ///
    /// # Errors
    ///
    /// See [`TerrainGenerator::generate`].
    pub fn generate_traced<R>(
        &self,
        width: u32,
        height: u32,
        start: CellCoord,
        target: CellCoord,
        rng: &mut R,
    ) -> Result<Retried<TerrainGrid>, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let size = GridSize::new(width, height);
        size.ensure_contains(&[start, target])?;
        self.options.validate()?;

        if !self.options.ensure_path {
            return Ok(Retried {
                value: self.synthesize(size, start, target, rng),
                resolution: Resolution::Accepted { attempt: 1 },
            });
        }

        let retried = retry_or_fallback(
            self.options.max_attempts,
            rng,
            |rng, _| self.synthesize(size, start, target, rng),
            |grid| is_reachable(grid, start, target),
            |rng| {
                fallback::corridor_grid(
                    size,
                    start,
                    target,
                    self.options.obstacle_probability,
                    rng,
                )
            },
        );

        match retried.resolution {
            Resolution::Accepted { attempt } => {
                info!("terrain {size} accepted on attempt {attempt}");
            }
            Resolution::Fallback { attempts } => {
                warn!("terrain {size} unreachable after {attempts} attempts, carved corridor");
            }
        }

        Ok(retried)
    }

    fn synthesize<R>(
        &self,
        size: GridSize,
        start: CellCoord,
        target: CellCoord,
        rng: &mut R,
    ) -> TerrainGrid
    where
        R: Rng + ?Sized,
    {
        let biomes = BiomeMap::generate(size, self.options.biome_size, rng);

        TerrainGrid::from_fn(size, |cell| {
            let biome = biomes.biome_at(cell);
            if cell == start || cell == target {
                return TerrainCell::ground(biome);
            }

            let value = self.noise.sample(cell);
            let category = if self.options.use_transitions
                && biomes.borders_other_biome(cell, self.options.transition_width)
            {
                TerrainCategory::Shoreline
            } else {
                category_for(biome, value)
            };

            TerrainCell::new(
                category,
                TileKey::new(biome, category, CellNoise::variant(value)),
            )
        })
    }
}
