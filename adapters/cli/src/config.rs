use std::{fs, path::Path};

use anyhow::{Context, Result};
use crystal_trail_system_layout_randomizer::LayoutOptions;
use crystal_trail_system_terrain_generation::TerrainOptions;
use serde::Deserialize;

/// Tuning loaded from a TOML file with optional `[terrain]` and `[layout]` tables.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GenerationConfig {
    /// Options handed to the terrain generator.
    pub(crate) terrain: TerrainOptions,
    /// Options handed to the layout randomizer.
    pub(crate) layout: LayoutOptions,
}

impl GenerationConfig {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read generation config at {}", path.display()))?;
        parse_config(&contents)
            .with_context(|| format!("invalid generation config at {}", path.display()))
    }
}

fn parse_config(contents: &str) -> Result<GenerationConfig> {
    toml::from_str(contents).context("failed to parse generation config toml contents")
}
