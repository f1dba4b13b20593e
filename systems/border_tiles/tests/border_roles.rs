use crystal_trail_core::BorderRole;
use crystal_trail_system_border_tiles::{roles_for_area, select_role};
use proptest::prelude::*;

fn is_boundary(coordinate: u32, dimension: u32) -> bool {
    coordinate == 0 || coordinate == dimension - 1
}

#[test]
fn every_small_area_resolves_each_cell_consistently() {
    for width in 1..=10 {
        for height in 1..=10 {
            let roles = roles_for_area(width, height);
            assert_eq!(roles.len(), height as usize);

            for row in 0..height {
                assert_eq!(roles[row as usize].len(), width as usize);
                for column in 0..width {
                    let role = select_role(column, row, width, height);
                    assert_eq!(role, roles[row as usize][column as usize]);

                    let on_column_boundary = is_boundary(column, width);
                    let on_row_boundary = is_boundary(row, height);

                    assert_eq!(
                        role.is_corner(),
                        on_column_boundary && on_row_boundary,
                        "({column}, {row}) in {width}x{height} resolved to {role:?}",
                    );
                    assert_eq!(
                        role.is_edge(),
                        on_column_boundary != on_row_boundary,
                        "({column}, {row}) in {width}x{height} resolved to {role:?}",
                    );
                    assert_eq!(
                        role == BorderRole::Center,
                        !on_column_boundary && !on_row_boundary,
                    );
                }
            }
        }
    }
}

#[test]
fn interior_areas_have_four_distinct_corners() {
    for size in 2..=10 {
        let roles = roles_for_area(size, size);
        let last = size as usize - 1;
        assert_eq!(roles[0][0], BorderRole::TopLeft);
        assert_eq!(roles[0][last], BorderRole::TopRight);
        assert_eq!(roles[last][0], BorderRole::BottomLeft);
        assert_eq!(roles[last][last], BorderRole::BottomRight);
    }
}

proptest! {
    #[test]
    fn corner_roles_match_side_of_area(
        width in 2_u32..200,
        height in 2_u32..200,
        column_seed in any::<u32>(),
        row_seed in any::<u32>(),
    ) {
        let column = column_seed % width;
        let row = row_seed % height;
        let role = select_role(column, row, width, height);

        match role {
            BorderRole::TopLeft => prop_assert!(column == 0 && row == 0),
            BorderRole::TopRight => prop_assert!(column == width - 1 && row == 0),
            BorderRole::BottomLeft => prop_assert!(column == 0 && row == height - 1),
            BorderRole::BottomRight => prop_assert!(column == width - 1 && row == height - 1),
            BorderRole::TopEdge => prop_assert!(row == 0),
            BorderRole::BottomEdge => prop_assert!(row == height - 1),
            BorderRole::LeftEdge => prop_assert!(column == 0),
            BorderRole::RightEdge => prop_assert!(column == width - 1),
            BorderRole::Center => prop_assert!(
                column > 0 && column < width - 1 && row > 0 && row < height - 1
            ),
        }
    }
}
