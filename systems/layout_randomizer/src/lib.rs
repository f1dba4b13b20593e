#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised placement of collectibles and a target on obstacle-free puzzle
//! boards.
//!
//! Every layout this system returns can be solved within the caller's move
//! budget: candidates are drawn at random, scored with the exact route solver
//! in [`route`], and rejected until one fits. After a bounded number of
//! rejections a compact deterministic layout is substituted instead.

mod candidates;
mod fallback;
pub mod route;

use crystal_trail_core::{
    retry::{retry_or_fallback, Resolution, Retried},
    CellCoord, ConfigurationIssue, GenerationError, GridSize, PuzzleLayout,
};
use log::{debug, info};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::{
    candidates::candidate_cells,
    fallback::compact_layout,
    route::{optimal_move_count, MAX_COLLECTIBLES},
};

/// Default number of random layouts tried before the compact fallback.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Steers generation towards layouts that use a chosen share of the budget.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BalanceOptions {
    /// Number of solvable layouts generated before picking one.
    pub trials: u32,
    /// Fraction of `max_moves` the optimal move count should approach.
    pub target_ratio: f64,
}

impl Default for BalanceOptions {
    fn default() -> Self {
        Self {
            trials: 20,
            target_ratio: 0.78,
        }
    }
}

/// Placement policy and retry limits for the layout randomizer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Keeps the bottom row free of collectibles and the target.
    pub reserve_last_row: bool,
    /// Keeps the four orthogonal neighbours of the start free.
    pub keep_start_neighbors_clear: bool,
    /// Additional cells that may not hold a collectible or the target.
    pub forbidden: Vec<CellCoord>,
    /// Random layouts tried before falling back to the compact layout.
    pub max_attempts: u32,
    /// Enables balanced mode when present.
    pub balance: Option<BalanceOptions>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            reserve_last_row: true,
            keep_start_neighbors_clear: false,
            forbidden: Vec::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            balance: None,
        }
    }
}

/// Pure system producing solvable puzzle layouts.
#[derive(Clone, Debug, Default)]
pub struct LayoutRandomizer {
    options: LayoutOptions,
}

impl LayoutRandomizer {
    /// Creates a randomizer using the provided options.
    #[must_use]
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Options the randomizer was configured with.
    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Places `collectible_count` collectibles and a target on a
    /// `width` x `height` board so the optimal route from `start` takes at
    /// most `max_moves` moves.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfiguration`] when the board is
    /// empty, `start` lies outside it, more than
    /// [`route::MAX_COLLECTIBLES`] collectibles are requested, the placement
    /// policy leaves too few cells, or `max_moves` cannot be met.
    pub fn generate<R>(
        &self,
        width: u32,
        height: u32,
        start: CellCoord,
        collectible_count: usize,
        max_moves: u32,
        rng: &mut R,
    ) -> Result<PuzzleLayout, GenerationError>
    where
        R: Rng + ?Sized,
    {
        self.generate_traced(width, height, start, collectible_count, max_moves, rng)
            .map(Retried::into_inner)
    }

    /// Same as [`LayoutRandomizer::generate`], also reporting whether a random
    /// layout was accepted or the compact fallback was used.
    ///
    /// # Errors
    ///
    /// See [`LayoutRandomizer::generate`].
    pub fn generate_traced<R>(
        &self,
        width: u32,
        height: u32,
        start: CellCoord,
        collectible_count: usize,
        max_moves: u32,
        rng: &mut R,
    ) -> Result<Retried<PuzzleLayout>, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let size = GridSize::new(width, height);
        let candidates = self.validated_candidates(size, start, collectible_count, max_moves)?;

        let Some(balance) = &self.options.balance else {
            return self.solvable_layout(start, &candidates, collectible_count, max_moves, rng);
        };

        let target_moves = balance.target_ratio * f64::from(max_moves);
        let gap = |layout: &PuzzleLayout| {
            (f64::from(layout.optimal_move_count()) - target_moves).abs()
        };

        let mut best =
            self.solvable_layout(start, &candidates, collectible_count, max_moves, rng)?;
        let mut best_gap = gap(&best.value);
        for trial in 1..balance.trials {
            let candidate =
                self.solvable_layout(start, &candidates, collectible_count, max_moves, rng)?;
            let candidate_gap = gap(&candidate.value);
            debug!(
                "balance trial {trial}: {} moves, gap {candidate_gap:.2}",
                candidate.value.optimal_move_count()
            );
            if candidate_gap < best_gap {
                best = candidate;
                best_gap = candidate_gap;
            }
        }

        info!(
            "balanced layout uses {} of {max_moves} moves (aim {target_moves:.1})",
            best.value.optimal_move_count()
        );
        Ok(best)
    }

    fn validated_candidates(
        &self,
        size: GridSize,
        start: CellCoord,
        collectible_count: usize,
        max_moves: u32,
    ) -> Result<Vec<CellCoord>, GenerationError> {
        size.ensure_contains(&[start])?;

        if collectible_count > MAX_COLLECTIBLES {
            return Err(ConfigurationIssue::TooManyCollectibles {
                requested: collectible_count,
                limit: MAX_COLLECTIBLES,
            }
            .into());
        }

        if let Some(balance) = &self.options.balance {
            if !(0.0..=1.0).contains(&balance.target_ratio) {
                return Err(ConfigurationIssue::BalanceRatio(balance.target_ratio).into());
            }
        }

        let candidates = candidate_cells(size, start, &self.options);
        if candidates.len() <= collectible_count {
            return Err(ConfigurationIssue::NotEnoughCandidates {
                required: collectible_count + 1,
                available: candidates.len(),
            }
            .into());
        }

        // Each collectible and the target sit on distinct cells, so every
        // route needs at least one move per placement.
        let minimum = u32::try_from(collectible_count + 1).unwrap_or(u32::MAX);
        if max_moves < minimum {
            return Err(ConfigurationIssue::MoveBudgetUnreachable {
                required: minimum,
                max_moves,
            }
            .into());
        }

        Ok(candidates)
    }

    fn solvable_layout<R>(
        &self,
        start: CellCoord,
        candidates: &[CellCoord],
        collectible_count: usize,
        max_moves: u32,
        rng: &mut R,
    ) -> Result<Retried<PuzzleLayout>, GenerationError>
    where
        R: Rng + ?Sized,
    {
        let mut pool = candidates.to_vec();

        let Retried { value, resolution } = retry_or_fallback(
            self.options.max_attempts,
            rng,
            |rng, _| {
                let (picked, _) = pool.partial_shuffle(rng, collectible_count + 1);
                let target = picked[collectible_count];
                assemble(start, &picked[..collectible_count], target)
            },
            |candidate| {
                candidate
                    .as_ref()
                    .map_or(true, |layout| layout.optimal_move_count() <= max_moves)
            },
            |_| match compact_layout(start, candidates, collectible_count) {
                Some((collectibles, target)) => assemble(start, &collectibles, target),
                None => Err(ConfigurationIssue::NotEnoughCandidates {
                    required: collectible_count + 1,
                    available: candidates.len(),
                }
                .into()),
            },
        );

        let layout = value?;
        if layout.optimal_move_count() > max_moves {
            return Err(ConfigurationIssue::MoveBudgetUnreachable {
                required: layout.optimal_move_count(),
                max_moves,
            }
            .into());
        }

        if let Resolution::Accepted { attempt } = resolution {
            debug!(
                "layout accepted on attempt {attempt} with {} moves",
                layout.optimal_move_count()
            );
        }

        Ok(Retried {
            value: layout,
            resolution,
        })
    }
}

fn assemble(
    start: CellCoord,
    collectibles: &[CellCoord],
    target: CellCoord,
) -> Result<PuzzleLayout, GenerationError> {
    let moves = optimal_move_count(start, collectibles, target)?;
    PuzzleLayout::new(start, collectibles.iter().copied(), target, moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn issue(result: Result<PuzzleLayout, GenerationError>) -> ConfigurationIssue {
        match result {
            Err(GenerationError::InvalidConfiguration(issue)) => issue,
            Ok(layout) => panic!("expected an error, got {layout:?}"),
        }
    }

    #[test]
    fn rejects_start_outside_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result =
            LayoutRandomizer::default().generate(4, 4, CellCoord::new(4, 0), 2, 20, &mut rng);
        assert!(matches!(
            issue(result),
            ConfigurationIssue::CellOutOfBounds { .. }
        ));
    }

    #[test]
    fn rejects_too_many_collectibles() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = LayoutRandomizer::default().generate(
            10,
            10,
            CellCoord::new(0, 0),
            MAX_COLLECTIBLES + 1,
            500,
            &mut rng,
        );
        assert_eq!(
            issue(result),
            ConfigurationIssue::TooManyCollectibles {
                requested: MAX_COLLECTIBLES + 1,
                limit: MAX_COLLECTIBLES,
            }
        );
    }

    #[test]
    fn rejects_boards_without_room() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result =
            LayoutRandomizer::default().generate(3, 2, CellCoord::new(0, 0), 2, 20, &mut rng);
        assert_eq!(
            issue(result),
            ConfigurationIssue::NotEnoughCandidates {
                required: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn rejects_budgets_below_one_move_per_placement() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result =
            LayoutRandomizer::default().generate(5, 5, CellCoord::new(0, 0), 3, 3, &mut rng);
        assert_eq!(
            issue(result),
            ConfigurationIssue::MoveBudgetUnreachable {
                required: 4,
                max_moves: 3,
            }
        );
    }

    #[test]
    fn reports_budgets_the_fallback_cannot_meet() {
        // The only candidates sit far away from the start.
        let options = LayoutOptions {
            reserve_last_row: false,
            forbidden: GridSize::new(6, 6)
                .cells()
                .filter(|cell| cell.column() < 4)
                .collect(),
            max_attempts: 3,
            ..LayoutOptions::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let result =
            LayoutRandomizer::new(options).generate(6, 6, CellCoord::new(0, 0), 1, 2, &mut rng);
        assert!(matches!(
            issue(result),
            ConfigurationIssue::MoveBudgetUnreachable { max_moves: 2, .. }
        ));
    }

    #[test]
    fn rejects_balance_ratio_outside_unit_range() {
        let options = LayoutOptions {
            balance: Some(BalanceOptions {
                target_ratio: 1.5,
                ..BalanceOptions::default()
            }),
            ..LayoutOptions::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result =
            LayoutRandomizer::new(options).generate(5, 5, CellCoord::new(0, 0), 2, 20, &mut rng);
        assert_eq!(issue(result), ConfigurationIssue::BalanceRatio(1.5));
    }

    #[test]
    fn zero_collectibles_still_place_a_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let layout = LayoutRandomizer::default()
            .generate(4, 4, CellCoord::new(0, 3), 0, 10, &mut rng)
            .expect("valid request");

        assert!(layout.collectibles().is_empty());
        assert_ne!(layout.target(), layout.start());
        assert_eq!(
            layout.optimal_move_count(),
            layout.start().manhattan_distance(layout.target())
        );
    }

    #[test]
    fn zero_attempts_use_compact_layout() {
        let randomizer = LayoutRandomizer::new(LayoutOptions {
            max_attempts: 0,
            ..LayoutOptions::default()
        });
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let traced = randomizer
            .generate_traced(5, 5, CellCoord::new(2, 4), 3, 10, &mut rng)
            .expect("compact layout fits the budget");

        assert!(traced.is_fallback());
        let layout = traced.value;
        assert_eq!(layout.start(), CellCoord::new(2, 4));
        assert_eq!(layout.collectibles().len(), 3);
        assert!(layout.optimal_move_count() <= 10);
        assert!(layout.cells().skip(1).all(|cell| cell.row() < 4));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: LayoutOptions = serde_json::from_str(r#"{"max_attempts": 7}"#)
            .expect("partial options deserialize");
        assert_eq!(options.max_attempts, 7);
        assert!(options.reserve_last_row);
        assert!(options.balance.is_none());

        let balanced: LayoutOptions =
            serde_json::from_str(r#"{"balance": {"trials": 4}}"#).expect("balance deserializes");
        assert_eq!(
            balanced.balance,
            Some(BalanceOptions {
                trials: 4,
                target_ratio: 0.78,
            })
        );
    }
}
