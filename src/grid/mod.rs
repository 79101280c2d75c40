// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Grid/cell algebra.
//!
//! A grid zone is divided into `rows x cols` unit positions. Cells cover those positions with a
//! top-left anchor and a span; at all times the cells of a grid tile the positions exactly (no
//! overlaps, no gaps). Merge and split replace cells wholesale and are validated before any
//! mutation, so a rejected operation leaves the grid untouched.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::geometry::{Point, Rect};
use crate::model::ids::{CellId, CellIdTag, IdSequence};

pub const MERGED_CELL_NAME: &str = "Merged cell";
pub const MAX_GRID_DIMENSION: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    InvalidDimensions { rows: i64, cols: i64 },
    #[error("grid may not exceed {max} rows or columns (got {rows}x{cols})")]
    TooLarge { rows: u32, cols: u32, max: u32 },
    #[error("`{input}` is not a whole number")]
    UnparsableDimension { input: String },
    #[error("select at least two cells to merge (selected {selected})")]
    NotEnoughCells { selected: usize },
    #[error("cell {0} does not belong to this grid")]
    UnknownCell(CellId),
    #[error("selected cells do not form a contiguous rectangle")]
    NotRectangular,
    #[error("select exactly one merged cell to split (selected {selected})")]
    SplitNeedsSingleCell { selected: usize },
    #[error("cell {0} is a single unit and cannot be split")]
    NotSplittable(CellId),
    #[error("cell {0} has an empty span")]
    ZeroSpan(CellId),
    #[error("cell {0} extends outside the grid")]
    OutOfBounds(CellId),
    #[error("cell {0} appears more than once")]
    DuplicateCell(CellId),
    #[error("position ({row}, {col}) is covered by more than one cell")]
    Overlap { row: u32, col: u32 },
    #[error("position ({row}, {col}) is not covered by any cell")]
    Gap { row: u32, col: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl GridSize {
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions {
                rows: i64::from(rows),
                cols: i64::from(cols),
            });
        }
        if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
            return Err(GridError::TooLarge {
                rows,
                cols,
                max: MAX_GRID_DIMENSION,
            });
        }
        Ok(Self { rows, cols })
    }

    pub fn area(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

/// Parses the rows/cols text typed into the grid prompt.
pub fn parse_grid_dimensions(rows: &str, cols: &str) -> Result<GridSize, GridError> {
    fn parse_one(input: &str) -> Result<i64, GridError> {
        input
            .trim()
            .parse::<i64>()
            .map_err(|_| GridError::UnparsableDimension {
                input: input.to_owned(),
            })
    }

    let rows = parse_one(rows)?;
    let cols = parse_one(cols)?;
    if rows <= 0 || cols <= 0 {
        return Err(GridError::InvalidDimensions { rows, cols });
    }
    let clamp = |value: i64| u32::try_from(value).unwrap_or(u32::MAX);
    GridSize::new(clamp(rows), clamp(cols))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    id: CellId,
    row: u32,
    col: u32,
    row_span: u32,
    col_span: u32,
    name: String,
}

impl Cell {
    pub fn new(
        id: CellId,
        row: u32,
        col: u32,
        row_span: u32,
        col_span: u32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            row,
            col,
            row_span,
            col_span,
            name: name.into(),
        }
    }

    /// A 1x1 cell named after its (1-based) position.
    pub fn unit(id: CellId, row: u32, col: u32) -> Self {
        Self::new(id, row, col, 1, 1, unit_cell_name(row, col))
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn row_span(&self) -> u32 {
        self.row_span
    }

    pub fn col_span(&self) -> u32 {
        self.col_span
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn last_row(&self) -> u32 {
        self.row.saturating_add(self.row_span.saturating_sub(1))
    }

    pub fn last_col(&self) -> u32 {
        self.col.saturating_add(self.col_span.saturating_sub(1))
    }

    pub fn area(&self) -> u64 {
        u64::from(self.row_span) * u64::from(self.col_span)
    }

    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    pub fn covers(&self, row: u32, col: u32) -> bool {
        (self.row..=self.last_row()).contains(&row) && (self.col..=self.last_col()).contains(&col)
    }
}

pub fn unit_cell_name(row: u32, col: u32) -> String {
    format!("Cell {}-{}", row + 1, col + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    cell_ids: IdSequence<CellIdTag>,
}

impl Grid {
    /// A fresh grid of unit cells.
    pub fn new(rows: u32, cols: u32) -> Result<Self, GridError> {
        let size = GridSize::new(rows, cols)?;
        let mut cell_ids = IdSequence::new();
        let mut cells = Vec::with_capacity(usize::try_from(size.area()).unwrap_or(0));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::unit(cell_ids.next_id(), row, col));
            }
        }
        Ok(Self {
            size,
            cells,
            cell_ids,
        })
    }

    /// Rebuilds a grid from stored cells, rejecting anything that does not tile exactly.
    pub fn from_parts(size: GridSize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let size = GridSize::new(size.rows, size.cols)?;
        validate_tiling(size, &cells)?;

        let mut cell_ids = IdSequence::new();
        for cell in &cells {
            cell_ids.observe(cell.id);
        }
        let mut grid = Self {
            size,
            cells,
            cell_ids,
        };
        grid.sort_cells();
        Ok(grid)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Cells in row-major anchor order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    pub fn contains_cell(&self, id: CellId) -> bool {
        self.cell(id).is_some()
    }

    pub fn cell_covering(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.covers(row, col))
    }

    pub fn rename_cell(&mut self, id: CellId, name: impl Into<String>) -> Result<(), GridError> {
        let cell = self
            .cells
            .iter_mut()
            .find(|cell| cell.id == id)
            .ok_or(GridError::UnknownCell(id))?;
        cell.set_name(name);
        Ok(())
    }

    /// Replaces the selected cells with one cell spanning their bounding box.
    ///
    /// Legal only when the selection covers its bounding box exactly. Cells never overlap, so
    /// that is the case iff the summed span areas equal the box area.
    pub fn merge(&mut self, selected: &BTreeSet<CellId>) -> Result<CellId, GridError> {
        if selected.len() < 2 {
            return Err(GridError::NotEnoughCells {
                selected: selected.len(),
            });
        }

        let mut picked = Vec::with_capacity(selected.len());
        for id in selected {
            picked.push(self.cell(*id).ok_or(GridError::UnknownCell(*id))?);
        }

        let min_row = picked.iter().map(|cell| cell.row).min().unwrap_or(0);
        let min_col = picked.iter().map(|cell| cell.col).min().unwrap_or(0);
        let max_row = picked.iter().map(|cell| cell.last_row()).max().unwrap_or(0);
        let max_col = picked.iter().map(|cell| cell.last_col()).max().unwrap_or(0);

        let row_span = max_row - min_row + 1;
        let col_span = max_col - min_col + 1;
        let covered: u64 = picked.iter().map(|cell| cell.area()).sum();
        if covered != u64::from(row_span) * u64::from(col_span) {
            return Err(GridError::NotRectangular);
        }

        let merged_id = self.cell_ids.next_id();
        self.cells.retain(|cell| !selected.contains(&cell.id));
        self.cells.push(Cell::new(
            merged_id,
            min_row,
            min_col,
            row_span,
            col_span,
            MERGED_CELL_NAME,
        ));
        self.sort_cells();
        tracing::debug!(cell = %merged_id, row_span, col_span, "merged cells");
        Ok(merged_id)
    }

    /// Splits a merged cell back into unit cells with fresh ids.
    pub fn split(&mut self, id: CellId) -> Result<Vec<CellId>, GridError> {
        let index = self
            .cells
            .iter()
            .position(|cell| cell.id == id)
            .ok_or(GridError::UnknownCell(id))?;
        if !self.cells[index].is_merged() {
            return Err(GridError::NotSplittable(id));
        }

        let merged = self.cells.remove(index);
        let mut created = Vec::with_capacity(usize::try_from(merged.area()).unwrap_or(0));
        for row in merged.row..=merged.last_row() {
            for col in merged.col..=merged.last_col() {
                let cell_id = self.cell_ids.next_id();
                self.cells.push(Cell::unit(cell_id, row, col));
                created.push(cell_id);
            }
        }
        self.sort_cells();
        tracing::debug!(cell = %id, created = created.len(), "split cell");
        Ok(created)
    }

    /// `split` for a selection, which must hold exactly one cell.
    pub fn split_selection(&mut self, selected: &BTreeSet<CellId>) -> Result<Vec<CellId>, GridError> {
        let mut ids = selected.iter();
        match (ids.next(), ids.next()) {
            (Some(id), None) => self.split(*id),
            _ => Err(GridError::SplitNeedsSingleCell {
                selected: selected.len(),
            }),
        }
    }

    /// Canvas rectangle of `cell` when the grid fills `zone`.
    pub fn cell_rect(&self, cell: &Cell, zone: Rect) -> Rect {
        let unit_width = zone.width / f64::from(self.size.cols);
        let unit_height = zone.height / f64::from(self.size.rows);
        Rect::new(
            zone.x + f64::from(cell.col) * unit_width,
            zone.y + f64::from(cell.row) * unit_height,
            f64::from(cell.col_span) * unit_width,
            f64::from(cell.row_span) * unit_height,
        )
    }

    pub fn cells_overlapping(&self, zone: Rect, rect: Rect) -> BTreeSet<CellId> {
        self.cells
            .iter()
            .filter(|cell| self.cell_rect(cell, zone).intersects(&rect))
            .map(|cell| cell.id)
            .collect()
    }

    pub fn cell_at_point(&self, zone: Rect, point: Point) -> Option<CellId> {
        if !zone.contains_point(point) || zone.width <= 0.0 || zone.height <= 0.0 {
            return None;
        }
        let unit_width = zone.width / f64::from(self.size.cols);
        let unit_height = zone.height / f64::from(self.size.rows);
        let col = (((point.x - zone.x) / unit_width).floor() as u32).min(self.size.cols - 1);
        let row = (((point.y - zone.y) / unit_height).floor() as u32).min(self.size.rows - 1);
        self.cell_covering(row, col).map(Cell::id)
    }

    fn sort_cells(&mut self) {
        self.cells.sort_by_key(|cell| (cell.row, cell.col));
    }
}

fn validate_tiling(size: GridSize, cells: &[Cell]) -> Result<(), GridError> {
    let cols = size.cols as usize;
    let mut covered = vec![false; size.rows as usize * cols];
    let mut seen = BTreeSet::new();

    for cell in cells {
        if !seen.insert(cell.id) {
            return Err(GridError::DuplicateCell(cell.id));
        }
        if cell.row_span == 0 || cell.col_span == 0 {
            return Err(GridError::ZeroSpan(cell.id));
        }
        if cell.last_row() >= size.rows || cell.last_col() >= size.cols {
            return Err(GridError::OutOfBounds(cell.id));
        }
        for row in cell.row..=cell.last_row() {
            for col in cell.col..=cell.last_col() {
                let slot = &mut covered[row as usize * cols + col as usize];
                if *slot {
                    return Err(GridError::Overlap { row, col });
                }
                *slot = true;
            }
        }
    }

    match covered.iter().position(|slot| !slot) {
        Some(index) => Err(GridError::Gap {
            row: (index / cols) as u32,
            col: (index % cols) as u32,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests;
