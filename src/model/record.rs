// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire form of the zone forest.
//!
//! This is the JSON tree exchanged with the persistence gateway and written to the layout
//! file. Field names are camelCase to stay compatible with layouts saved by the browser
//! editor.

use serde::{Deserialize, Serialize};

use super::color::ZoneColor;
use super::ids::{CellId, ZoneId};
use crate::grid::{Cell, GridSize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub id: ZoneId,
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub color: ZoneColor,
    #[serde(default)]
    pub children: Vec<ZoneRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<GridSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_cells: Option<Vec<CellRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub id: CellId,
    pub row: u32,
    pub col: u32,
    #[serde(default = "unit_span")]
    pub row_span: u32,
    #[serde(default = "unit_span")]
    pub col_span: u32,
    #[serde(default)]
    pub name: String,
}

fn unit_span() -> u32 {
    1
}

impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        Self {
            id: cell.id(),
            row: cell.row(),
            col: cell.col(),
            row_span: cell.row_span(),
            col_span: cell.col_span(),
            name: cell.name().to_owned(),
        }
    }
}

impl From<&CellRecord> for Cell {
    fn from(record: &CellRecord) -> Self {
        Cell::new(
            record.id,
            record.row,
            record.col,
            record.row_span,
            record.col_span,
            record.name.clone(),
        )
    }
}

/// Counts zones in a forest, descendants included.
pub fn count_zones(records: &[ZoneRecord]) -> usize {
    records
        .iter()
        .map(|record| 1 + count_zones(&record.children))
        .sum()
}
