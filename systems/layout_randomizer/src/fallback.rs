//! Deterministic compact layout used once random attempts are exhausted.

use crystal_trail_core::CellCoord;

/// Chains the nearest free candidate to the previous pick, starting from
/// `start`, until `collectible_count + 1` cells are chosen. The final pick
/// becomes the target.
///
/// Ties are broken by distance, then row, then column, so the result depends
/// only on the inputs. Returns `None` when too few candidates are available.
pub(crate) fn compact_layout(
    start: CellCoord,
    candidates: &[CellCoord],
    collectible_count: usize,
) -> Option<(Vec<CellCoord>, CellCoord)> {
    if candidates.len() <= collectible_count {
        return None;
    }

    let mut remaining = candidates.to_vec();
    let mut chain = Vec::with_capacity(collectible_count + 1);
    let mut position = start;

    while chain.len() <= collectible_count {
        let (index, _) = remaining.iter().enumerate().min_by_key(|(_, cell)| {
            (
                position.manhattan_distance(**cell),
                cell.row(),
                cell.column(),
            )
        })?;
        position = remaining.swap_remove(index);
        chain.push(position);
    }

    let target = chain.pop()?;
    Some((chain, target))
}
