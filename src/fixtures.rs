// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared test fixtures.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::grid::Grid;
use crate::model::layout::{ContainerRef, Layout};
use crate::model::record::ZoneRecord;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub(crate) fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!(
            "zoneplan-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A hall holding an aisle, next to a 2x2 shelf whose top-left cell is "Aisle 1".
pub(crate) fn pharmacy_records() -> Vec<ZoneRecord> {
    let mut layout = Layout::new();
    let hall = layout.add_zone(ContainerRef::Root).unwrap();
    layout.add_zone(ContainerRef::Zone(hall)).unwrap();
    let shelf = layout.add_zone(ContainerRef::Root).unwrap();
    let mut grid = Grid::new(2, 2).unwrap();
    let top_left = grid.cell_covering(0, 0).unwrap().id();
    grid.rename_cell(top_left, "Aisle 1").unwrap();
    layout.install_grid(shelf, grid).unwrap();
    layout.to_records()
}
