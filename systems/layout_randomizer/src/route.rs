//! Exact shortest visiting order over Manhattan distances.
//!
//! Puzzle boards have no obstacles, so the cost between two cells is exactly
//! their Manhattan distance and the only open question is the order in which
//! collectibles are visited. Up to [`EXHAUSTIVE_LIMIT`] collectibles every
//! permutation is explored (`O(n!)`, pruned without losing exactness); above
//! that a bitmask dynamic program (`O(2^n * n^2)`) takes over, up to
//! [`MAX_COLLECTIBLES`].

use crystal_trail_core::{CellCoord, ConfigurationIssue, GenerationError};
use serde::Serialize;

/// Largest collectible count solved by permutation search.
pub const EXHAUSTIVE_LIMIT: usize = 8;

/// Largest collectible count the solver accepts.
pub const MAX_COLLECTIBLES: usize = 16;

/// Cheapest order in which to visit every collectible before the target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Collectibles in visiting order.
    pub order: Vec<CellCoord>,
    /// Total orthogonal moves from the start, through `order`, to the target.
    pub moves: u32,
}

/// Minimum number of moves that visits every collectible and ends on `target`.
///
/// # Errors
///
/// Fails when more than [`MAX_COLLECTIBLES`] collectibles are supplied.
pub fn optimal_move_count(
    start: CellCoord,
    collectibles: &[CellCoord],
    target: CellCoord,
) -> Result<u32, GenerationError> {
    optimal_route(start, collectibles, target).map(|route| route.moves)
}

/// Cheapest route from `start` through every collectible to `target`.
///
/// # Errors
///
/// Fails when more than [`MAX_COLLECTIBLES`] collectibles are supplied.
pub fn optimal_route(
    start: CellCoord,
    collectibles: &[CellCoord],
    target: CellCoord,
) -> Result<Route, GenerationError> {
    if collectibles.len() > MAX_COLLECTIBLES {
        return Err(ConfigurationIssue::TooManyCollectibles {
            requested: collectibles.len(),
            limit: MAX_COLLECTIBLES,
        }
        .into());
    }

    if collectibles.len() <= EXHAUSTIVE_LIMIT {
        Ok(exhaustive_route(start, collectibles, target))
    } else {
        Ok(held_karp_route(start, collectibles, target))
    }
}

struct PermutationSearch<'a> {
    collectibles: &'a [CellCoord],
    target: CellCoord,
    used: Vec<bool>,
    order: Vec<usize>,
    best_moves: u32,
    best_order: Vec<usize>,
}

impl PermutationSearch<'_> {
    fn visit(&mut self, position: CellCoord, moves: u32) {
        // Distances are non-negative, so a prefix already at the best total
        // cannot improve on it.
        if moves >= self.best_moves {
            return;
        }

        if self.order.len() == self.collectibles.len() {
            let total = moves + position.manhattan_distance(self.target);
            if total < self.best_moves {
                self.best_moves = total;
                self.best_order.clone_from(&self.order);
            }
            return;
        }

        for index in 0..self.collectibles.len() {
            if self.used[index] {
                continue;
            }

            let next = self.collectibles[index];
            self.used[index] = true;
            self.order.push(index);
            self.visit(next, moves + position.manhattan_distance(next));
            let _ = self.order.pop();
            self.used[index] = false;
        }
    }
}

fn exhaustive_route(start: CellCoord, collectibles: &[CellCoord], target: CellCoord) -> Route {
    let mut search = PermutationSearch {
        collectibles,
        target,
        used: vec![false; collectibles.len()],
        order: Vec::with_capacity(collectibles.len()),
        best_moves: u32::MAX,
        best_order: Vec::new(),
    };
    search.visit(start, 0);

    Route {
        order: search
            .best_order
            .into_iter()
            .map(|index| collectibles[index])
            .collect(),
        moves: search.best_moves,
    }
}

fn held_karp_route(start: CellCoord, collectibles: &[CellCoord], target: CellCoord) -> Route {
    let count = collectibles.len();
    if count == 0 {
        return Route {
            order: Vec::new(),
            moves: start.manhattan_distance(target),
        };
    }

    let full = (1_usize << count) - 1;
    let slot = |mask: usize, last: usize| mask * count + last;
    let mut cost = vec![u32::MAX; (full + 1) * count];
    let mut parent = vec![usize::MAX; (full + 1) * count];

    for (index, cell) in collectibles.iter().enumerate() {
        cost[slot(1 << index, index)] = start.manhattan_distance(*cell);
    }

    for mask in 1..=full {
        for last in 0..count {
            if mask & (1 << last) == 0 {
                continue;
            }

            let current = cost[slot(mask, last)];
            if current == u32::MAX {
                continue;
            }

            for next in 0..count {
                if mask & (1 << next) != 0 {
                    continue;
                }

                let next_slot = slot(mask | (1 << next), next);
                let candidate =
                    current + collectibles[last].manhattan_distance(collectibles[next]);
                if candidate < cost[next_slot] {
                    cost[next_slot] = candidate;
                    parent[next_slot] = last;
                }
            }
        }
    }

    let closing = (0..count)
        .map(|last| {
            (
                last,
                cost[slot(full, last)] + collectibles[last].manhattan_distance(target),
            )
        })
        .min_by_key(|(_, moves)| *moves);
    let Some((mut last, moves)) = closing else {
        return Route {
            order: Vec::new(),
            moves: start.manhattan_distance(target),
        };
    };

    let mut order = Vec::with_capacity(count);
    let mut mask = full;
    loop {
        order.push(collectibles[last]);
        let previous = parent[slot(mask, last)];
        mask &= !(1 << last);
        if previous == usize::MAX {
            break;
        }
        last = previous;
    }
    order.reverse();

    Route { order, moves }
}

/// Moves needed to walk `start`, then `order`, then `target`.
#[must_use]
pub fn route_cost(start: CellCoord, order: &[CellCoord], target: CellCoord) -> u32 {
    let mut moves = 0;
    let mut position = start;
    for &cell in order {
        moves += position.manhattan_distance(cell);
        position = cell;
    }
    moves + position.manhattan_distance(target)
}
