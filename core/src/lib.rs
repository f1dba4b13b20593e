#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crystal Trail level generators.
//!
//! This crate defines the data surface that connects the generation systems
//! with the game-state and rendering layers. Generators receive grid
//! dimensions and [`CellCoord`] endpoints, and hand back immutable values:
//! terrain cells (collected into a grid by the world crate), [`BorderRole`]
//! values for seamless tiling, and [`PuzzleLayout`] values for the
//! block-programming puzzles. Values are produced once per level and replaced
//! wholesale when a new level is requested.

pub mod retry;

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Label of the random stream that drives terrain generation.
pub const RNG_STREAM_TERRAIN: &str = "terrain";
/// Label of the random stream that drives puzzle layout generation.
pub const RNG_STREAM_LAYOUT: &str = "layout";

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king-move) distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Dimensions of a rectangular grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the grid in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the grid in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the grid contains no cells at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        let height = usize::try_from(self.height).unwrap_or(usize::MAX);
        width.saturating_mul(height)
    }

    /// Reports whether the provided cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Row-major offset of the cell, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Iterates every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }

    /// Validates that the grid is non-empty and contains every provided cell.
    pub fn ensure_contains(&self, cells: &[CellCoord]) -> Result<(), GenerationError> {
        if self.is_empty() {
            return Err(ConfigurationIssue::EmptyGrid {
                width: self.width,
                height: self.height,
            }
            .into());
        }

        if let Some(&cell) = cells.iter().find(|cell| !self.contains(**cell)) {
            return Err(ConfigurationIssue::CellOutOfBounds { cell, size: *self }.into());
        }

        Ok(())
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Biome labels used to partition the open world into regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    /// Temperate meadows with the occasional pond and copse.
    Grassland,
    /// Marshes dominated by open water.
    Wetland,
    /// Ice sheets with scattered crystals.
    Frozen,
    /// Scorched dirt broken up by lava.
    Volcanic,
    /// Boulder fields and cliffs.
    Rocky,
}

impl Biome {
    /// Every biome in declaration order.
    pub const ALL: [Biome; 5] = [
        Biome::Grassland,
        Biome::Wetland,
        Biome::Frozen,
        Biome::Volcanic,
        Biome::Rocky,
    ];

    /// Lowercase identifier of the biome.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grassland => "grassland",
            Self::Wetland => "wetland",
            Self::Frozen => "frozen",
            Self::Volcanic => "volcanic",
            Self::Rocky => "rocky",
        }
    }
}

/// Closed set of terrain categories a generated cell can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainCategory {
    /// Plain walkable ground.
    Ground,
    /// Open water; blocks movement.
    Water,
    /// Transition band between two biomes.
    Shoreline,
    /// Molten rock; blocks movement.
    Lava,
    /// Slippery but traversable ice.
    Ice,
    /// Solid boulder; blocks movement.
    Rock,
    /// Loose soil.
    Dirt,
    /// Tree standing on ground.
    Tree,
    /// Bush standing on ground.
    Bush,
    /// Collectible crystal.
    Crystal,
}

impl TerrainCategory {
    /// Every category in declaration order.
    pub const ALL: [TerrainCategory; 10] = [
        TerrainCategory::Ground,
        TerrainCategory::Water,
        TerrainCategory::Shoreline,
        TerrainCategory::Lava,
        TerrainCategory::Ice,
        TerrainCategory::Rock,
        TerrainCategory::Dirt,
        TerrainCategory::Tree,
        TerrainCategory::Bush,
        TerrainCategory::Crystal,
    ];

    /// Whether the player may step onto a cell of this category.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Water | Self::Lava | Self::Rock)
    }

    /// Whether a cell of this category holds a collectible.
    #[must_use]
    pub const fn is_collectible(self) -> bool {
        matches!(self, Self::Crystal)
    }

    /// Legacy category name consumed by older renderers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Water => "water",
            Self::Shoreline => "shoreline",
            Self::Lava => "lava",
            Self::Ice => "ice",
            Self::Rock => "rock",
            Self::Dirt => "dirt",
            Self::Tree => "tree",
            Self::Bush => "bush",
            Self::Crystal => "crystal",
        }
    }
}

/// Opaque asset key the renderer resolves into a drawable tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileKey {
    biome: Biome,
    category: TerrainCategory,
    variant: u8,
}

impl TileKey {
    /// Creates a tile key for the provided biome, category and art variant.
    #[must_use]
    pub const fn new(biome: Biome, category: TerrainCategory, variant: u8) -> Self {
        Self {
            biome,
            category,
            variant,
        }
    }

    /// Biome whose tileset the key refers to.
    #[must_use]
    pub const fn biome(&self) -> Biome {
        self.biome
    }

    /// Category drawn by the tile.
    #[must_use]
    pub const fn category(&self) -> TerrainCategory {
        self.category
    }

    /// Art variant within the tileset.
    #[must_use]
    pub const fn variant(&self) -> u8 {
        self.variant
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.biome.name(),
            self.category.name(),
            self.variant
        )
    }
}

/// Single generated terrain cell.
///
/// The walkable and collectible flags are derived from the category at
/// construction, so they can never disagree with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainCell {
    category: TerrainCategory,
    walkable: bool,
    collectible: bool,
    tile: TileKey,
}

impl TerrainCell {
    /// Creates a cell of the provided category drawn with the provided tile.
    #[must_use]
    pub const fn new(category: TerrainCategory, tile: TileKey) -> Self {
        Self {
            category,
            walkable: category.is_walkable(),
            collectible: category.is_collectible(),
            tile,
        }
    }

    /// Plain ground cell drawn from the provided biome's tileset.
    #[must_use]
    pub const fn ground(biome: Biome) -> Self {
        Self::new(
            TerrainCategory::Ground,
            TileKey::new(biome, TerrainCategory::Ground, 0),
        )
    }

    /// Terrain category of the cell.
    #[must_use]
    pub const fn category(&self) -> TerrainCategory {
        self.category
    }

    /// Whether the player may traverse the cell.
    #[must_use]
    pub const fn walkable(&self) -> bool {
        self.walkable
    }

    /// Whether the cell holds a collectible.
    #[must_use]
    pub const fn collectible(&self) -> bool {
        self.collectible
    }

    /// Asset key used by the renderer.
    #[must_use]
    pub const fn tile(&self) -> TileKey {
        self.tile
    }
}

/// Canonical position of a cell within a rectangular area, used to pick
/// seamlessly tiling border art.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderRole {
    /// Upper-left corner.
    TopLeft,
    /// Upper-right corner.
    TopRight,
    /// Lower-left corner.
    BottomLeft,
    /// Lower-right corner.
    BottomRight,
    /// Top edge between the two upper corners.
    TopEdge,
    /// Bottom edge between the two lower corners.
    BottomEdge,
    /// Left edge between the two left corners.
    LeftEdge,
    /// Right edge between the two right corners.
    RightEdge,
    /// Interior cell.
    Center,
}

impl BorderRole {
    /// Reports whether the role is one of the four corners.
    #[must_use]
    pub const fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    /// Reports whether the role is one of the four edges.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(
            self,
            Self::TopEdge | Self::BottomEdge | Self::LeftEdge | Self::RightEdge
        )
    }
}

/// Solvable placement of a start, collectibles and a target on a puzzle board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleLayout {
    start: CellCoord,
    collectibles: BTreeSet<CellCoord>,
    target: CellCoord,
    optimal_move_count: u32,
}

impl PuzzleLayout {
    /// Assembles a layout, rejecting coordinates that are not pairwise distinct.
    pub fn new(
        start: CellCoord,
        collectibles: impl IntoIterator<Item = CellCoord>,
        target: CellCoord,
        optimal_move_count: u32,
    ) -> Result<Self, GenerationError> {
        let mut set = BTreeSet::new();
        for cell in collectibles {
            if cell == start || cell == target || !set.insert(cell) {
                return Err(ConfigurationIssue::DuplicateCell { cell }.into());
            }
        }

        if start == target {
            return Err(ConfigurationIssue::DuplicateCell { cell: start }.into());
        }

        Ok(Self {
            start,
            collectibles: set,
            target,
            optimal_move_count,
        })
    }

    /// Cell the player starts from.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Collectibles that must all be visited, in ascending coordinate order.
    #[must_use]
    pub fn collectibles(&self) -> &BTreeSet<CellCoord> {
        &self.collectibles
    }

    /// Goal cell reached after every collectible.
    #[must_use]
    pub const fn target(&self) -> CellCoord {
        self.target
    }

    /// Minimum number of orthogonal moves that solves the layout.
    #[must_use]
    pub const fn optimal_move_count(&self) -> u32 {
        self.optimal_move_count
    }

    /// Iterates the start, every collectible and the target.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        std::iter::once(self.start)
            .chain(self.collectibles.iter().copied())
            .chain(std::iter::once(self.target))
    }
}

/// Failure raised when a generator is handed input it cannot honour.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The request is malformed; the issue names the offending input.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationIssue),
}

/// Specific reason a configuration was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationIssue {
    /// At least one grid dimension is zero.
    #[error("grid {width}x{height} has no cells")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// A required cell lies outside the grid.
    #[error("cell {cell} lies outside the {size} grid")]
    CellOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
        /// Grid the cell was checked against.
        size: GridSize,
    },
    /// Biome blocks must span at least one cell.
    #[error("biome size must be at least 1")]
    ZeroBiomeSize,
    /// Probabilities must lie within the unit interval.
    #[error("obstacle probability {0} is outside [0, 1]")]
    ObstacleProbability(f64),
    /// Balanced mode aims at a fraction of the move budget.
    #[error("balance target ratio {0} is outside [0, 1]")]
    BalanceRatio(f64),
    /// The exact route solver cannot handle this many collectibles.
    #[error("{requested} collectibles exceed the limit of {limit}")]
    TooManyCollectibles {
        /// Requested collectible count.
        requested: usize,
        /// Largest supported collectible count.
        limit: usize,
    },
    /// Not enough candidate cells remain for the collectibles and the target.
    #[error("{required} placements requested but only {available} candidate cells remain")]
    NotEnoughCandidates {
        /// Cells needed (collectibles plus target).
        required: usize,
        /// Cells available after exclusions.
        available: usize,
    },
    /// No layout can be solved within the move budget.
    #[error("layout needs at least {required} moves but the budget is {max_moves}")]
    MoveBudgetUnreachable {
        /// Moves the cheapest known layout needs.
        required: u32,
        /// Budget supplied by the caller.
        max_moves: u32,
    },
    /// Layout coordinates were not pairwise distinct.
    #[error("cell {cell} appears more than once in the layout")]
    DuplicateCell {
        /// Repeated cell.
        cell: CellCoord,
    },
}

/// Derives an independent random stream seed from a level seed and a label.
#[must_use]
pub fn derive_stream_seed(level_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(level_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
