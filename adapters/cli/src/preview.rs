//! Plain-text previews printed by the developer CLI.

use std::fmt::Write as _;

use crystal_trail_core::{BorderRole, CellCoord, GridSize, PuzzleLayout, TerrainCategory};
use crystal_trail_system_layout_randomizer::route::Route;
use crystal_trail_world::TerrainGrid;

const ORDER_GLYPHS: &[u8] = b"123456789abcdefg";

/// Glyph used for a terrain category in ASCII previews.
pub(crate) fn terrain_glyph(category: TerrainCategory) -> char {
    match category {
        TerrainCategory::Ground => '.',
        TerrainCategory::Water => '~',
        TerrainCategory::Shoreline => ',',
        TerrainCategory::Lava => '%',
        TerrainCategory::Ice => '_',
        TerrainCategory::Rock => '#',
        TerrainCategory::Dirt => ':',
        TerrainCategory::Tree => 'T',
        TerrainCategory::Bush => '*',
        TerrainCategory::Crystal => '$',
    }
}

/// Renders a terrain grid with `S` and `G` marking the endpoints, followed by
/// a per-category census.
pub(crate) fn render_terrain(grid: &TerrainGrid, start: CellCoord, target: CellCoord) -> String {
    let mut out = String::new();
    for row in 0..grid.height() {
        for column in 0..grid.width() {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == start {
                'S'
            } else if cell == target {
                'G'
            } else {
                grid.cell(cell)
                    .map_or(' ', |terrain| terrain_glyph(terrain.category()))
            };
            out.push(glyph);
        }
        out.push('\n');
    }

    out.push('\n');
    for (category, count) in grid.census() {
        let _ = writeln!(
            out,
            "{} {:<10} {count:>5}",
            terrain_glyph(category),
            category.name()
        );
    }
    out
}

/// Renders a puzzle board where collectibles show their position in the
/// optimal visiting order.
pub(crate) fn render_layout(size: GridSize, layout: &PuzzleLayout, route: &Route) -> String {
    let mut out = String::new();
    for row in 0..size.height() {
        for column in 0..size.width() {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == layout.start() {
                'S'
            } else if cell == layout.target() {
                'T'
            } else if let Some(index) = route.order.iter().position(|visit| *visit == cell) {
                ORDER_GLYPHS.get(index).map_or('C', |glyph| char::from(*glyph))
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }

    let stops: Vec<String> = std::iter::once(layout.start())
        .chain(route.order.iter().copied())
        .chain(std::iter::once(layout.target()))
        .map(|cell| cell.to_string())
        .collect();
    let _ = writeln!(out, "\nroute: {}", stops.join(" -> "));
    let _ = writeln!(out, "optimal moves: {}", route.moves);
    out
}

/// Box-drawing glyph for a border role.
pub(crate) fn border_glyph(role: BorderRole) -> char {
    match role {
        BorderRole::TopLeft => '┌',
        BorderRole::TopEdge => '─',
        BorderRole::TopRight => '┐',
        BorderRole::LeftEdge => '│',
        BorderRole::Center => '·',
        BorderRole::RightEdge => '│',
        BorderRole::BottomLeft => '└',
        BorderRole::BottomEdge => '─',
        BorderRole::BottomRight => '┘',
    }
}

/// Renders the role of every cell, one line per row.
pub(crate) fn render_borders(roles: &[Vec<BorderRole>]) -> String {
    let mut out = String::new();
    for row in roles {
        out.extend(row.iter().copied().map(border_glyph));
        out.push('\n');
    }
    out
}
