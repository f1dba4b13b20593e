use std::collections::BTreeSet;

use crystal_trail_core::{CellCoord, PuzzleLayout};
use crystal_trail_system_layout_randomizer::{
    route::route_cost, BalanceOptions, LayoutOptions, LayoutRandomizer,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn brute_force_moves(start: CellCoord, remaining: &mut Vec<CellCoord>, target: CellCoord) -> u32 {
    if remaining.is_empty() {
        return start.manhattan_distance(target);
    }

    let mut best = u32::MAX;
    for index in 0..remaining.len() {
        let next = remaining.remove(index);
        best = best.min(start.manhattan_distance(next) + brute_force_moves(next, remaining, target));
        remaining.insert(index, next);
    }
    best
}

fn assert_well_formed(layout: &PuzzleLayout, width: u32, height: u32, max_moves: u32) {
    let cells: Vec<_> = layout.cells().collect();
    let distinct: BTreeSet<_> = cells.iter().copied().collect();
    assert_eq!(distinct.len(), cells.len(), "cells overlap in {layout:?}");
    assert!(cells
        .iter()
        .all(|cell| cell.column() < width && cell.row() < height));
    assert!(layout.optimal_move_count() <= max_moves);

    let mut collectibles: Vec<_> = layout.collectibles().iter().copied().collect();
    assert_eq!(
        layout.optimal_move_count(),
        brute_force_moves(layout.start(), &mut collectibles, layout.target())
    );
}

#[test]
fn corner_example_reports_brute_force_optimum() {
    let layout = PuzzleLayout::new(
        CellCoord::new(0, 0),
        [CellCoord::new(2, 0), CellCoord::new(0, 2)],
        CellCoord::new(2, 2),
        0,
    )
    .expect("distinct cells");
    let mut collectibles: Vec<_> = layout.collectibles().iter().copied().collect();
    let expected = brute_force_moves(layout.start(), &mut collectibles, layout.target());

    let route = crystal_trail_system_layout_randomizer::route::optimal_route(
        layout.start(),
        &collectibles,
        layout.target(),
    )
    .expect("small input");
    assert_eq!(route.moves, expected);
    assert_eq!(
        route_cost(layout.start(), &route.order, layout.target()),
        expected
    );
}

#[test]
fn generated_layouts_stay_within_budget() {
    let randomizer = LayoutRandomizer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0x1a70_0175);

    for seed in 0..200_u64 {
        let width = 4 + (seed % 5) as u32;
        let height = 4 + (seed % 3) as u32;
        let start = CellCoord::new(seed as u32 % width, height - 1);
        let count = (seed % 5) as usize;
        let max_moves = 6 + (seed % 10) as u32;

        let layout = randomizer
            .generate(width, height, start, count, max_moves, &mut rng)
            .expect("request fits the board");
        assert_eq!(layout.start(), start);
        assert_eq!(layout.collectibles().len(), count);
        assert_well_formed(&layout, width, height, max_moves);
    }
}

#[test]
fn reserved_row_is_never_used() {
    let randomizer = LayoutRandomizer::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    for _ in 0..100 {
        let layout = randomizer
            .generate(6, 6, CellCoord::new(3, 5), 4, 30, &mut rng)
            .expect("valid request");
        assert!(layout.cells().skip(1).all(|cell| cell.row() < 5));
    }
}

#[test]
fn fallback_is_deterministic() {
    let randomizer = LayoutRandomizer::new(LayoutOptions {
        max_attempts: 0,
        ..LayoutOptions::default()
    });

    let first = randomizer
        .generate(7, 7, CellCoord::new(3, 6), 5, 20, &mut ChaCha8Rng::seed_from_u64(1))
        .expect("compact layout fits");
    let second = randomizer
        .generate(7, 7, CellCoord::new(3, 6), 5, 20, &mut ChaCha8Rng::seed_from_u64(2))
        .expect("compact layout fits");

    assert_eq!(first, second);
    assert_well_formed(&first, 7, 7, 20);
}

#[test]
fn identical_seeds_produce_identical_layouts() {
    let randomizer = LayoutRandomizer::default();
    let generate = |seed| {
        randomizer
            .generate(8, 8, CellCoord::new(0, 7), 6, 40, &mut ChaCha8Rng::seed_from_u64(seed))
            .expect("valid request")
    };

    assert_eq!(generate(42), generate(42));
}

#[test]
fn balanced_mode_approaches_target_ratio() {
    let max_moves = 30;
    let balanced = LayoutRandomizer::new(LayoutOptions {
        balance: Some(BalanceOptions::default()),
        ..LayoutOptions::default()
    });
    let plain = LayoutRandomizer::default();
    let aim = 0.78 * f64::from(max_moves);
    let gap = |layout: &PuzzleLayout| (f64::from(layout.optimal_move_count()) - aim).abs();

    let mut balanced_gap = 0.0;
    let mut plain_gap = 0.0;
    for seed in 0..20 {
        let start = CellCoord::new(4, 9);
        let layout = balanced
            .generate(9, 10, start, 4, max_moves, &mut ChaCha8Rng::seed_from_u64(seed))
            .expect("valid request");
        assert_well_formed(&layout, 9, 10, max_moves);
        balanced_gap += gap(&layout);

        let layout = plain
            .generate(9, 10, start, 4, max_moves, &mut ChaCha8Rng::seed_from_u64(seed))
            .expect("valid request");
        plain_gap += gap(&layout);
    }

    assert!(
        balanced_gap <= plain_gap,
        "balanced {balanced_gap} should not exceed plain {plain_gap}"
    );
}

#[test]
fn nine_or_more_collectibles_are_solved_exactly() {
    let randomizer = LayoutRandomizer::new(LayoutOptions {
        max_attempts: 5,
        ..LayoutOptions::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let layout = randomizer
        .generate(6, 6, CellCoord::new(0, 5), 10, 60, &mut rng)
        .expect("valid request");

    assert_eq!(layout.collectibles().len(), 10);
    assert!(layout.optimal_move_count() <= 60);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_result_is_solvable_and_distinct(
        width in 3_u32..9,
        height in 3_u32..9,
        column_seed in any::<u32>(),
        count in 0_usize..6,
        slack in 0_u32..20,
        seed in any::<u64>(),
    ) {
        let start = CellCoord::new(column_seed % width, height - 1);
        let max_moves = count as u32 + 1 + slack;
        let randomizer = LayoutRandomizer::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        match randomizer.generate(width, height, start, count, max_moves, &mut rng) {
            Ok(layout) => {
                let cells: BTreeSet<_> = layout.cells().collect();
                prop_assert_eq!(cells.len(), count + 2);
                prop_assert!(layout.optimal_move_count() <= max_moves);
                let mut collectibles: Vec<_> = layout.collectibles().iter().copied().collect();
                prop_assert_eq!(
                    layout.optimal_move_count(),
                    brute_force_moves(start, &mut collectibles, layout.target())
                );
            }
            Err(error) => {
                // Only a budget tighter than the compact layout may fail.
                let message = error.to_string();
                prop_assert!(message.contains("moves"), "{}", message);
            }
        }
    }
}
