#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Crystal Trail generators.

mod config;
mod level_code;
mod preview;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crystal_trail_core::{
    derive_stream_seed, CellCoord, GridSize, PuzzleLayout, RNG_STREAM_LAYOUT, RNG_STREAM_TERRAIN,
};
use crystal_trail_system_border_tiles::roles_for_area;
use crystal_trail_system_layout_randomizer::{
    route::{optimal_route, Route},
    BalanceOptions, LayoutOptions, LayoutRandomizer,
};
use crystal_trail_system_terrain_generation::{TerrainGenerator, TerrainOptions};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{config::GenerationConfig, level_code::LevelCode};

/// Generate Crystal Trail terrain and puzzle layouts.
#[derive(Debug, Parser)]
#[command(name = "crystal-trail", version, about)]
struct Cli {
    /// Level seed every random stream is derived from.
    #[arg(long, global = true, default_value_t = 0)]
    seed: u64,

    /// TOML file with `[terrain]` and `[layout]` tuning tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug messages unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate an open-world terrain grid.
    Terrain(TerrainArgs),
    /// Generate a solvable puzzle layout.
    Layout(LayoutArgs),
    /// Print the border role of every cell in an area.
    Borders {
        /// Number of columns in the area.
        width: u32,
        /// Number of rows in the area.
        height: u32,
    },
    /// Check a level code and re-solve its layout.
    Decode {
        /// Code printed by `layout --format code`.
        code: String,
    },
}

#[derive(Debug, Args)]
struct TerrainArgs {
    /// Number of columns.
    #[arg(long, default_value_t = 24)]
    width: u32,

    /// Number of rows.
    #[arg(long, default_value_t = 12)]
    height: u32,

    /// Start cell as `column,row`.
    #[arg(long, value_parser = parse_cell, default_value = "0,0")]
    start: CellCoord,

    /// Target cell as `column,row`; defaults to the bottom-right corner.
    #[arg(long, value_parser = parse_cell)]
    target: Option<CellCoord>,

    /// Edge length of the square biome blocks.
    #[arg(long)]
    biome_size: Option<u32>,

    /// Disable shoreline transitions between biomes.
    #[arg(long, default_value_t = false)]
    no_transitions: bool,

    /// Radius searched for a neighbouring biome.
    #[arg(long)]
    transition_width: Option<u32>,

    /// Skip the reachability guarantee.
    #[arg(long, default_value_t = false)]
    allow_unreachable: bool,

    /// Output format.
    #[arg(value_enum, long, default_value_t = TerrainFormat::Ascii)]
    format: TerrainFormat,
}

#[derive(Debug, Args)]
struct LayoutArgs {
    /// Number of columns.
    #[arg(long, default_value_t = 7)]
    width: u32,

    /// Number of rows.
    #[arg(long, default_value_t = 7)]
    height: u32,

    /// Start cell as `column,row`; defaults to the middle of the bottom row.
    #[arg(long, value_parser = parse_cell)]
    start: Option<CellCoord>,

    /// Number of collectibles to place.
    #[arg(long, default_value_t = 4)]
    collectibles: usize,

    /// Move budget the optimal route must fit in.
    #[arg(long, default_value_t = 20)]
    max_moves: u32,

    /// Pick the layout closest to the configured share of the budget.
    #[arg(long, default_value_t = false)]
    balanced: bool,

    /// Random layouts tried before the compact fallback.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Output format.
    #[arg(value_enum, long, default_value_t = LayoutFormat::Ascii)]
    format: LayoutFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TerrainFormat {
    Ascii,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutFormat {
    Ascii,
    Json,
    Code,
}

/// Entry point for the Crystal Trail command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = GenerationConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Terrain(args) => run_terrain(args, config.terrain, cli.seed),
        Command::Layout(args) => run_layout(args, config.layout, cli.seed),
        Command::Borders { width, height } => {
            print!("{}", preview::render_borders(&roles_for_area(width, height)));
            Ok(())
        }
        Command::Decode { code } => run_decode(&code),
    }
}

fn run_terrain(args: TerrainArgs, mut options: TerrainOptions, seed: u64) -> Result<()> {
    if let Some(biome_size) = args.biome_size {
        options.biome_size = biome_size;
    }
    if let Some(transition_width) = args.transition_width {
        options.transition_width = transition_width;
    }
    options.use_transitions &= !args.no_transitions;
    options.ensure_path &= !args.allow_unreachable;

    let target = args.target.unwrap_or_else(|| {
        CellCoord::new(
            args.width.saturating_sub(1),
            args.height.saturating_sub(1),
        )
    });
    let generator = TerrainGenerator::new(options);
    let mut rng = ChaCha8Rng::seed_from_u64(derive_stream_seed(seed, RNG_STREAM_TERRAIN));
    let traced = generator
        .generate_traced(args.width, args.height, args.start, target, &mut rng)
        .context("terrain generation failed")?;
    if traced.is_fallback() {
        info!("terrain for seed {seed} uses the carved corridor");
    }

    match args.format {
        TerrainFormat::Ascii => {
            print!("{}", preview::render_terrain(&traced.value, args.start, target));
        }
        TerrainFormat::Json => {
            let json = serde_json::to_string_pretty(&traced.value)
                .context("failed to serialize terrain grid")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_layout(args: LayoutArgs, mut options: LayoutOptions, seed: u64) -> Result<()> {
    if let Some(max_attempts) = args.max_attempts {
        options.max_attempts = max_attempts;
    }
    if args.balanced && options.balance.is_none() {
        options.balance = Some(BalanceOptions::default());
    }

    let size = GridSize::new(args.width, args.height);
    let start = args
        .start
        .unwrap_or_else(|| CellCoord::new(args.width / 2, args.height.saturating_sub(1)));
    let randomizer = LayoutRandomizer::new(options);
    let mut rng = ChaCha8Rng::seed_from_u64(derive_stream_seed(seed, RNG_STREAM_LAYOUT));
    let traced = randomizer
        .generate_traced(
            args.width,
            args.height,
            start,
            args.collectibles,
            args.max_moves,
            &mut rng,
        )
        .context("layout generation failed")?;
    if traced.is_fallback() {
        warn!("no random layout fit {} moves, using the compact layout", args.max_moves);
    }
    let layout = traced.into_inner();

    match args.format {
        LayoutFormat::Ascii => {
            let route = solve(&layout)?;
            print!("{}", preview::render_layout(size, &layout, &route));
        }
        LayoutFormat::Json => {
            let json =
                serde_json::to_string_pretty(&layout).context("failed to serialize layout")?;
            println!("{json}");
        }
        LayoutFormat::Code => {
            let code = LevelCode::new(size, layout)?.encode()?;
            println!("{code}");
        }
    }
    Ok(())
}

fn run_decode(code: &str) -> Result<()> {
    let code = LevelCode::decode(code).context("failed to decode level code")?;
    let layout = code.layout();
    let route = solve(layout)?;
    print!("{}", preview::render_layout(code.size(), layout, &route));

    if route.moves != layout.optimal_move_count() {
        bail!(
            "level code claims {} moves but the optimal route takes {}",
            layout.optimal_move_count(),
            route.moves
        );
    }
    println!("stored move count matches");
    Ok(())
}

fn solve(layout: &PuzzleLayout) -> Result<Route> {
    let collectibles: Vec<CellCoord> = layout.collectibles().iter().copied().collect();
    optimal_route(layout.start(), &collectibles, layout.target())
        .context("failed to solve layout")
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(CellCoord::new(column, row))
}
