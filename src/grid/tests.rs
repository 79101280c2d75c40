// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use rstest::rstest;

use super::{parse_grid_dimensions, Cell, Grid, GridError, GridSize, MERGED_CELL_NAME};
use crate::model::geometry::{Point, Rect};
use crate::model::ids::CellId;

fn ids_at(grid: &Grid, positions: &[(u32, u32)]) -> BTreeSet<CellId> {
    positions
        .iter()
        .map(|(row, col)| grid.cell_covering(*row, *col).expect("cell at position").id())
        .collect()
}

fn assert_tiles(grid: &Grid) {
    let size = grid.size();
    for row in 0..size.rows {
        for col in 0..size.cols {
            let covering = grid.cells().iter().filter(|cell| cell.covers(row, col)).count();
            assert_eq!(covering, 1, "position ({row}, {col}) covered {covering} times");
        }
    }
}

#[test]
fn new_grid_has_one_unit_cell_per_position() {
    let grid = Grid::new(3, 4).expect("grid");
    assert_eq!(grid.cells().len(), 12);

    let positions: BTreeSet<(u32, u32)> =
        grid.cells().iter().map(|cell| (cell.row(), cell.col())).collect();
    assert_eq!(positions.len(), 12);
    assert!(grid.cells().iter().all(|cell| cell.row_span() == 1 && cell.col_span() == 1));
    assert_tiles(&grid);
    assert_eq!(grid.cell_covering(0, 0).expect("cell").name(), "Cell 1-1");
    assert_eq!(grid.cell_covering(2, 3).expect("cell").name(), "Cell 3-4");
}

#[rstest]
#[case(0, 3)]
#[case(3, 0)]
#[case(0, 0)]
fn new_grid_rejects_empty_dimensions(#[case] rows: u32, #[case] cols: u32) {
    let err = Grid::new(rows, cols).unwrap_err();
    assert!(matches!(err, GridError::InvalidDimensions { .. }));
}

#[rstest]
#[case("3", "4", Ok(GridSize { rows: 3, cols: 4 }))]
#[case(" 2 ", "2\n", Ok(GridSize { rows: 2, cols: 2 }))]
#[case("0", "4", Err(GridError::InvalidDimensions { rows: 0, cols: 4 }))]
#[case("-1", "4", Err(GridError::InvalidDimensions { rows: -1, cols: 4 }))]
#[case("", "4", Err(GridError::UnparsableDimension { input: String::new() }))]
#[case("two", "4", Err(GridError::UnparsableDimension { input: "two".to_owned() }))]
fn parses_prompt_dimensions(
    #[case] rows: &str,
    #[case] cols: &str,
    #[case] expected: Result<GridSize, GridError>,
) {
    assert_eq!(parse_grid_dimensions(rows, cols), expected);
}

#[test]
fn oversized_prompt_dimensions_are_rejected() {
    let err = parse_grid_dimensions("5000", "2").unwrap_err();
    assert!(matches!(err, GridError::TooLarge { .. }));
}

#[test]
fn merge_square_then_split_round_trips_coverage() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let all = ids_at(&grid, &[(0, 0), (0, 1), (1, 0), (1, 1)]);

    let merged_id = grid.merge(&all).expect("merge");
    assert_eq!(grid.cells().len(), 1);
    let merged = grid.cell(merged_id).expect("merged cell");
    assert_eq!((merged.row(), merged.col()), (0, 0));
    assert_eq!((merged.row_span(), merged.col_span()), (2, 2));
    assert_eq!(merged.name(), MERGED_CELL_NAME);

    let created = grid.split(merged_id).expect("split");
    assert_eq!(created.len(), 4);
    let positions: Vec<(u32, u32, u32, u32)> = grid
        .cells()
        .iter()
        .map(|cell| (cell.row(), cell.col(), cell.row_span(), cell.col_span()))
        .collect();
    assert_eq!(positions, vec![(0, 0, 1, 1), (0, 1, 1, 1), (1, 0, 1, 1), (1, 1, 1, 1)]);
    assert_tiles(&grid);
}

#[rstest]
#[case::diagonal(&[(0, 0), (1, 1)])]
#[case::l_shape(&[(0, 0), (0, 1), (1, 0)])]
#[case::gap_in_row(&[(0, 0), (0, 2)])]
fn merge_rejects_non_rectangular_selection(#[case] positions: &[(u32, u32)]) {
    let mut grid = Grid::new(3, 3).expect("grid");
    let before = grid.clone();
    let selected = ids_at(&grid, positions);

    let err = grid.merge(&selected).unwrap_err();
    assert_eq!(err, GridError::NotRectangular);
    assert_eq!(grid, before);
}

#[test]
fn merge_requires_two_cells() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let selected = ids_at(&grid, &[(0, 0)]);
    assert_eq!(grid.merge(&selected), Err(GridError::NotEnoughCells { selected: 1 }));
}

#[test]
fn merge_rejects_foreign_cells() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let mut selected = ids_at(&grid, &[(0, 0)]);
    selected.insert(CellId::new(999));
    assert_eq!(grid.merge(&selected), Err(GridError::UnknownCell(CellId::new(999))));
    assert_eq!(grid.cells().len(), 4);
}

#[test]
fn merge_accounts_for_existing_spans() {
    let mut grid = Grid::new(2, 3).expect("grid");
    let left = ids_at(&grid, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    let block = grid.merge(&left).expect("merge block");

    let mut selected = ids_at(&grid, &[(0, 2), (1, 2)]);
    selected.insert(block);
    let whole = grid.merge(&selected).expect("merge whole grid");

    let cell = grid.cell(whole).expect("cell");
    assert_eq!((cell.row_span(), cell.col_span()), (2, 3));
    assert_eq!(grid.cells().len(), 1);
}

#[test]
fn merge_rejects_selection_whose_span_leaves_the_box_uncovered() {
    let mut grid = Grid::new(3, 3).expect("grid");
    let block = grid.merge(&ids_at(&grid, &[(0, 0), (0, 1), (1, 0), (1, 1)])).expect("merge");

    let mut selected = ids_at(&grid, &[(2, 2)]);
    selected.insert(block);
    let before = grid.clone();
    assert_eq!(grid.merge(&selected), Err(GridError::NotRectangular));
    assert_eq!(grid, before);
}

#[test]
fn split_rejects_unit_cells_and_multi_selection() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let single = ids_at(&grid, &[(0, 0)]);
    let id = *single.iter().next().expect("id");
    assert_eq!(grid.split(id), Err(GridError::NotSplittable(id)));

    let pair = ids_at(&grid, &[(0, 0), (0, 1)]);
    assert_eq!(grid.split_selection(&pair), Err(GridError::SplitNeedsSingleCell { selected: 2 }));
}

#[test]
fn split_ids_never_collide_with_live_cells() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let top = grid.merge(&ids_at(&grid, &[(0, 0), (0, 1)])).expect("merge");
    let created = grid.split(top).expect("split");

    let live: BTreeSet<CellId> = grid.cells().iter().map(Cell::id).collect();
    assert_eq!(live.len(), grid.cells().len());
    assert!(created.iter().all(|id| live.contains(id)));
    assert!(!live.contains(&top));
}

#[test]
fn split_names_cells_by_absolute_position() {
    let mut grid = Grid::new(3, 3).expect("grid");
    let merged = grid.merge(&ids_at(&grid, &[(1, 1), (1, 2), (2, 1), (2, 2)])).expect("merge");
    grid.split(merged).expect("split");
    assert_eq!(grid.cell_covering(2, 2).expect("cell").name(), "Cell 3-3");
}

#[rstest]
#[case::gap(vec![Cell::unit(CellId::new(1), 0, 0)], GridError::Gap { row: 0, col: 1 })]
#[case::overlap(
    vec![
        Cell::new(CellId::new(1), 0, 0, 1, 2, "wide"),
        Cell::unit(CellId::new(2), 0, 1),
    ],
    GridError::Overlap { row: 0, col: 1 },
)]
#[case::out_of_bounds(
    vec![Cell::new(CellId::new(1), 0, 0, 1, 3, "too wide")],
    GridError::OutOfBounds(CellId::new(1)),
)]
#[case::zero_span(
    vec![Cell::new(CellId::new(1), 0, 0, 0, 2, "empty")],
    GridError::ZeroSpan(CellId::new(1)),
)]
#[case::duplicate(
    vec![Cell::unit(CellId::new(1), 0, 0), Cell::unit(CellId::new(1), 0, 1)],
    GridError::DuplicateCell(CellId::new(1)),
)]
fn from_parts_rejects_broken_tilings(#[case] cells: Vec<Cell>, #[case] expected: GridError) {
    let size = GridSize { rows: 1, cols: 2 };
    assert_eq!(Grid::from_parts(size, cells), Err(expected));
}

#[test]
fn from_parts_allocates_ids_after_loaded_ones() {
    let size = GridSize { rows: 1, cols: 2 };
    let cells = vec![
        Cell::new(CellId::new(1_715_000_000_000), 0, 0, 1, 2, "shelf"),
    ];
    let mut grid = Grid::from_parts(size, cells).expect("grid");
    let created = grid.split(CellId::new(1_715_000_000_000)).expect("split");
    assert!(created.iter().all(|id| id.get() > 1_715_000_000_000));
}

#[test]
fn cell_geometry_follows_zone_rect() {
    let mut grid = Grid::new(2, 4).expect("grid");
    let zone = Rect::new(100.0, 50.0, 200.0, 80.0);
    let merged = grid.merge(&ids_at(&grid, &[(1, 2), (1, 3)])).expect("merge");

    let cell = grid.cell(merged).expect("cell");
    assert_eq!(grid.cell_rect(cell, zone), Rect::new(200.0, 90.0, 100.0, 40.0));
    assert_eq!(grid.cell_at_point(zone, Point::new(290.0, 120.0)), Some(merged));
    assert_eq!(grid.cell_at_point(zone, Point::new(10.0, 10.0)), None);

    let hits = grid.cells_overlapping(zone, Rect::new(95.0, 45.0, 10.0, 10.0));
    assert_eq!(hits, ids_at(&grid, &[(0, 0)]));
}
