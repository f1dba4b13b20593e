#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure border tile selection used by the world and puzzle renderers.
//!
//! Renderers fill rectangular areas with nine-slice tilesets. Each cell asks
//! [`select_role`] which of the nine canonical positions it occupies and then
//! maps that [`BorderRole`] onto a concrete asset.

use crystal_trail_core::BorderRole;

/// Resolves the border role of the cell at `column`, `row` in a
/// `width` x `height` area.
///
/// Corners take precedence over edges, and edges over the centre, so
/// degenerate areas still resolve unambiguously: a single cell is
/// [`BorderRole::TopLeft`], and the middle cells of a one-wide column are
/// [`BorderRole::LeftEdge`]. The function is total: a zero dimension behaves
/// like a dimension of one and coordinates past the area clamp onto its far
/// boundary.
#[must_use]
pub fn select_role(column: u32, row: u32, width: u32, height: u32) -> BorderRole {
    let last_column = width.saturating_sub(1);
    let last_row = height.saturating_sub(1);

    let top = row == 0;
    let bottom = row >= last_row;
    let left = column == 0;
    let right = column >= last_column;

    if top && left {
        BorderRole::TopLeft
    } else if top && right {
        BorderRole::TopRight
    } else if bottom && left {
        BorderRole::BottomLeft
    } else if bottom && right {
        BorderRole::BottomRight
    } else if top {
        BorderRole::TopEdge
    } else if bottom {
        BorderRole::BottomEdge
    } else if left {
        BorderRole::LeftEdge
    } else if right {
        BorderRole::RightEdge
    } else {
        BorderRole::Center
    }
}

/// Resolves the role of every cell in a `width` x `height` area, one vector per row.
#[must_use]
pub fn roles_for_area(width: u32, height: u32) -> Vec<Vec<BorderRole>> {
    (0..height)
        .map(|row| {
            (0..width)
                .map(|column| select_role(column, row, width, height))
                .collect()
        })
        .collect()
}
