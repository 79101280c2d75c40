// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The zone tree.
//!
//! Zones live in an arena keyed by id. Each container (the root forest, or a zone that has been
//! opened) owns an explicit list of child ids, and every zone id appears in exactly one such
//! list. Mutations go through `Layout` so the container lists and the revision counter stay in
//! step.

use std::collections::{BTreeMap, BTreeSet};

use super::geometry::Rect;
use super::ids::{IdSequence, ZoneId, ZoneIdTag};
use super::record::{CellRecord, ZoneRecord};
use super::zone::{Zone, ZoneContent, DEFAULT_ZONE_NAME, DEFAULT_ZONE_ORIGIN, DEFAULT_ZONE_SIZE};
use crate::grid::{Cell, Grid, GridError};

/// Where a zone lives: the top-level forest or the child list of another zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    Root,
    Zone(ZoneId),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("zone {0} does not exist")]
    UnknownZone(ZoneId),
    #[error("zone {0} is divided into cells")]
    ZoneHasGrid(ZoneId),
    #[error("zone {0} still contains child zones")]
    ZoneHasChildren(ZoneId),
    #[error("zone {0} has no cell grid")]
    NoGrid(ZoneId),
    #[error("zone id {0} appears more than once")]
    DuplicateZone(ZoneId),
    #[error("zone {0} has a grid size without cells, or cells without a grid size")]
    IncompleteGrid(ZoneId),
    #[error("zone {0} holds both child zones and a cell grid")]
    ConflictingContent(ZoneId),
    #[error("zone {zone}: {source}")]
    InvalidGrid { zone: ZoneId, source: GridError },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    zones: BTreeMap<ZoneId, Zone>,
    roots: Vec<ZoneId>,
    parents: BTreeMap<ZoneId, ZoneId>,
    zone_ids: IdSequence<ZoneIdTag>,
    rev: u64,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every mutation.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn roots(&self) -> &[ZoneId] {
        &self.roots
    }

    pub fn parent(&self, id: ZoneId) -> Option<ContainerRef> {
        if !self.zones.contains_key(&id) {
            return None;
        }
        Some(match self.parents.get(&id) {
            Some(parent) => ContainerRef::Zone(*parent),
            None => ContainerRef::Root,
        })
    }

    pub fn children(&self, container: ContainerRef) -> Result<&[ZoneId], LayoutError> {
        match container {
            ContainerRef::Root => Ok(&self.roots),
            ContainerRef::Zone(id) => self
                .zones
                .get(&id)
                .map(Zone::children)
                .ok_or(LayoutError::UnknownZone(id)),
        }
    }

    /// Zones of `container` in drawing order (last is on top).
    pub fn zones_in(&self, container: ContainerRef) -> Result<Vec<&Zone>, LayoutError> {
        Ok(self
            .children(container)?
            .iter()
            .filter_map(|id| self.zones.get(id))
            .collect())
    }

    pub fn contains(&self, container: ContainerRef, id: ZoneId) -> bool {
        self.parent(id) == Some(container)
    }

    /// Appends a zone with default geometry, named after its position in the container.
    pub fn add_zone(&mut self, container: ContainerRef) -> Result<ZoneId, LayoutError> {
        let mut children = self.children(container)?.to_vec();
        if let ContainerRef::Zone(parent) = container {
            if self.zones.get(&parent).is_some_and(Zone::has_grid) {
                return Err(LayoutError::ZoneHasGrid(parent));
            }
        }

        let id = self.zone_ids.next_id();
        let name = format!("Zone {}", children.len() + 1);
        let rect = Rect::from_origin_size(DEFAULT_ZONE_ORIGIN, DEFAULT_ZONE_SIZE);
        self.zones.insert(id, Zone::new(id, name, rect));
        if let ContainerRef::Zone(parent) = container {
            self.parents.insert(id, parent);
        }

        children.push(id);
        self.replace_children(container, children);
        Ok(id)
    }

    /// Turns a leaf into an (empty) container so zones can be added inside it.
    pub fn open_container(&mut self, id: ZoneId) -> Result<(), LayoutError> {
        let zone = self.zones.get_mut(&id).ok_or(LayoutError::UnknownZone(id))?;
        match zone.content() {
            ZoneContent::Leaf => {
                zone.set_content(ZoneContent::Container(Vec::new()));
                self.bump();
                Ok(())
            }
            ZoneContent::Container(_) => Ok(()),
            ZoneContent::Grid(_) => Err(LayoutError::ZoneHasGrid(id)),
        }
    }

    /// Removes the given zones from `container`; ids living elsewhere are left alone.
    /// Subtrees of removed zones are discarded with them.
    pub fn remove_zones(
        &mut self,
        container: ContainerRef,
        ids: &BTreeSet<ZoneId>,
    ) -> Result<Vec<ZoneId>, LayoutError> {
        let children = self.children(container)?.to_vec();
        let (removed, kept): (Vec<ZoneId>, Vec<ZoneId>) =
            children.into_iter().partition(|id| ids.contains(id));
        if removed.is_empty() {
            return Ok(removed);
        }

        for id in &removed {
            self.discard_subtree(*id);
        }
        self.replace_children(container, kept);
        Ok(removed)
    }

    /// Applies `f` to one zone. Content changes go through the dedicated methods instead.
    pub fn update_zone<R>(
        &mut self,
        id: ZoneId,
        f: impl FnOnce(&mut Zone) -> R,
    ) -> Result<R, LayoutError> {
        let zone = self.zones.get_mut(&id).ok_or(LayoutError::UnknownZone(id))?;
        let result = f(zone);
        self.bump();
        Ok(result)
    }

    /// Makes `id` a grid zone. The zone's name is cleared; its cells carry the labels now.
    pub fn install_grid(&mut self, id: ZoneId, grid: Grid) -> Result<(), LayoutError> {
        let zone = self.zones.get_mut(&id).ok_or(LayoutError::UnknownZone(id))?;
        if !zone.children().is_empty() {
            return Err(LayoutError::ZoneHasChildren(id));
        }
        zone.set_content(ZoneContent::Grid(grid));
        zone.set_name("");
        self.bump();
        Ok(())
    }

    pub fn update_grid<R>(
        &mut self,
        id: ZoneId,
        f: impl FnOnce(&mut Grid) -> Result<R, GridError>,
    ) -> Result<R, LayoutError> {
        let zone = self.zones.get_mut(&id).ok_or(LayoutError::UnknownZone(id))?;
        let grid = zone.grid_mut().ok_or(LayoutError::NoGrid(id))?;
        let result = f(grid).map_err(|source| LayoutError::InvalidGrid { zone: id, source })?;
        self.bump();
        Ok(result)
    }

    /// Drops the grid of `id`, leaving a plain zone with a non-empty name.
    pub fn clear_grid(&mut self, id: ZoneId) -> Result<(), LayoutError> {
        let zone = self.zones.get_mut(&id).ok_or(LayoutError::UnknownZone(id))?;
        if !zone.has_grid() {
            return Err(LayoutError::NoGrid(id));
        }
        zone.set_content(ZoneContent::Leaf);
        if zone.name().is_empty() {
            zone.set_name(DEFAULT_ZONE_NAME);
        }
        self.bump();
        Ok(())
    }

    /// Builds a layout from the wire form, rejecting duplicate ids and broken grids.
    pub fn from_records(records: &[ZoneRecord]) -> Result<Self, LayoutError> {
        let mut layout = Self::new();
        for record in records {
            let id = layout.load_record(record, None)?;
            layout.roots.push(id);
        }
        Ok(layout)
    }

    pub fn to_records(&self) -> Vec<ZoneRecord> {
        self.roots.iter().filter_map(|id| self.record_for(*id)).collect()
    }

    fn record_for(&self, id: ZoneId) -> Option<ZoneRecord> {
        let zone = self.zones.get(&id)?;
        let rect = zone.rect();
        let (grid_size, sub_cells) = match zone.grid() {
            Some(grid) => (
                Some(grid.size()),
                Some(grid.cells().iter().map(CellRecord::from).collect()),
            ),
            None => (None, None),
        };
        Some(ZoneRecord {
            id,
            name: zone.name().to_owned(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            color: zone.color(),
            children: zone
                .children()
                .iter()
                .filter_map(|child| self.record_for(*child))
                .collect(),
            grid_size,
            sub_cells,
        })
    }

    fn load_record(
        &mut self,
        record: &ZoneRecord,
        parent: Option<ZoneId>,
    ) -> Result<ZoneId, LayoutError> {
        let id = record.id;
        if self.zones.contains_key(&id) {
            return Err(LayoutError::DuplicateZone(id));
        }

        let rect = Rect::new(record.x, record.y, record.width, record.height);
        let mut zone = Zone::new(id, record.name.clone(), rect);
        zone.set_color(record.color);
        match (&record.grid_size, &record.sub_cells) {
            (Some(size), Some(cells)) => {
                if !record.children.is_empty() {
                    return Err(LayoutError::ConflictingContent(id));
                }
                let cells = cells.iter().map(Cell::from).collect();
                let grid = Grid::from_parts(*size, cells)
                    .map_err(|source| LayoutError::InvalidGrid { zone: id, source })?;
                zone.set_content(ZoneContent::Grid(grid));
            }
            (None, None) => {}
            _ => return Err(LayoutError::IncompleteGrid(id)),
        }

        self.zone_ids.observe(id);
        self.zones.insert(id, zone);
        if let Some(parent) = parent {
            self.parents.insert(id, parent);
        }

        if !record.children.is_empty() {
            let mut children = Vec::with_capacity(record.children.len());
            for child in &record.children {
                children.push(self.load_record(child, Some(id))?);
            }
            if let Some(zone) = self.zones.get_mut(&id) {
                zone.set_content(ZoneContent::Container(children));
            }
        }
        Ok(id)
    }

    fn replace_children(&mut self, container: ContainerRef, children: Vec<ZoneId>) {
        match container {
            ContainerRef::Root => self.roots = children,
            ContainerRef::Zone(id) => {
                if let Some(zone) = self.zones.get_mut(&id) {
                    zone.set_content(ZoneContent::Container(children));
                }
            }
        }
        self.bump();
    }

    fn discard_subtree(&mut self, id: ZoneId) {
        let Some(zone) = self.zones.remove(&id) else {
            return;
        };
        self.parents.remove(&id);
        for child in zone.children() {
            self.discard_subtree(*child);
        }
    }

    fn bump(&mut self) {
        self.rev = self.rev.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{ContainerRef, Layout, LayoutError};
    use crate::grid::{Grid, GridError};
    use crate::model::record::ZoneRecord;
    use crate::model::zone::DEFAULT_ZONE_NAME;

    #[test]
    fn add_zone_names_by_position_and_uses_default_geometry() {
        let mut layout = Layout::new();
        let first = layout.add_zone(ContainerRef::Root).expect("add");
        let second = layout.add_zone(ContainerRef::Root).expect("add");

        assert_eq!(layout.zone(first).expect("zone").name(), "Zone 1");
        assert_eq!(layout.zone(second).expect("zone").name(), "Zone 2");
        let rect = layout.zone(first).expect("zone").rect();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (50.0, 50.0, 120.0, 80.0));
        assert_eq!(layout.roots(), &[first, second]);
    }

    #[test]
    fn nested_zones_number_within_their_container() {
        let mut layout = Layout::new();
        let parent = layout.add_zone(ContainerRef::Root).expect("add");
        layout.add_zone(ContainerRef::Root).expect("add");
        let child = layout.add_zone(ContainerRef::Zone(parent)).expect("add child");

        assert_eq!(layout.zone(child).expect("zone").name(), "Zone 1");
        assert_eq!(layout.parent(child), Some(ContainerRef::Zone(parent)));
        assert!(layout.contains(ContainerRef::Zone(parent), child));
        assert!(!layout.contains(ContainerRef::Root, child));
    }

    #[test]
    fn removing_a_zone_discards_its_subtree_only() {
        let mut layout = Layout::new();
        let a = layout.add_zone(ContainerRef::Root).expect("add");
        let b = layout.add_zone(ContainerRef::Root).expect("add");
        let a_child = layout.add_zone(ContainerRef::Zone(a)).expect("add");
        let a_grandchild = layout.add_zone(ContainerRef::Zone(a_child)).expect("add");
        let b_child = layout.add_zone(ContainerRef::Zone(b)).expect("add");

        let removed = layout
            .remove_zones(ContainerRef::Root, &BTreeSet::from([a, b_child]))
            .expect("remove");

        assert_eq!(removed, vec![a]);
        assert!(layout.zone(a_child).is_none());
        assert!(layout.zone(a_grandchild).is_none());
        assert!(layout.zone(b_child).is_some());
        assert_eq!(layout.roots(), &[b]);
    }

    #[test]
    fn mutations_bump_revision() {
        let mut layout = Layout::new();
        let rev = layout.rev();
        let id = layout.add_zone(ContainerRef::Root).expect("add");
        assert!(layout.rev() > rev);

        let rev = layout.rev();
        layout.update_zone(id, |zone| zone.set_name("Counter")).expect("update");
        assert!(layout.rev() > rev);
    }

    #[test]
    fn grid_and_children_are_exclusive() {
        let mut layout = Layout::new();
        let parent = layout.add_zone(ContainerRef::Root).expect("add");
        layout.add_zone(ContainerRef::Zone(parent)).expect("add child");
        let err = layout.install_grid(parent, Grid::new(2, 2).expect("grid")).unwrap_err();
        assert_eq!(err, LayoutError::ZoneHasChildren(parent));

        let shelf = layout.add_zone(ContainerRef::Root).expect("add");
        layout.install_grid(shelf, Grid::new(2, 2).expect("grid")).expect("install");
        assert_eq!(layout.zone(shelf).expect("zone").name(), "");
        assert_eq!(
            layout.add_zone(ContainerRef::Zone(shelf)),
            Err(LayoutError::ZoneHasGrid(shelf))
        );
        assert_eq!(layout.open_container(shelf), Err(LayoutError::ZoneHasGrid(shelf)));
    }

    #[test]
    fn clearing_a_grid_restores_default_name() {
        let mut layout = Layout::new();
        let shelf = layout.add_zone(ContainerRef::Root).expect("add");
        layout.install_grid(shelf, Grid::new(1, 3).expect("grid")).expect("install");
        layout.clear_grid(shelf).expect("clear");

        let zone = layout.zone(shelf).expect("zone");
        assert!(!zone.has_grid());
        assert_eq!(zone.name(), DEFAULT_ZONE_NAME);
        assert_eq!(layout.clear_grid(shelf), Err(LayoutError::NoGrid(shelf)));
    }

    #[test]
    fn grid_errors_leave_the_grid_untouched() {
        let mut layout = Layout::new();
        let shelf = layout.add_zone(ContainerRef::Root).expect("add");
        layout.install_grid(shelf, Grid::new(2, 2).expect("grid")).expect("install");
        let before = layout.zone(shelf).expect("zone").clone();

        let err = layout
            .update_grid(shelf, |grid| grid.merge(&BTreeSet::new()))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidGrid {
                zone: shelf,
                source: GridError::NotEnoughCells { selected: 0 },
            }
        );
        assert_eq!(layout.zone(shelf), Some(&before));
    }

    #[test]
    fn records_round_trip_nested_forest() {
        let mut layout = Layout::new();
        let hall = layout.add_zone(ContainerRef::Root).expect("add");
        let aisle = layout.add_zone(ContainerRef::Zone(hall)).expect("add");
        let shelf = layout.add_zone(ContainerRef::Zone(aisle)).expect("add");
        layout.install_grid(shelf, Grid::new(2, 3).expect("grid")).expect("install");

        let records = layout.to_records();
        let reloaded = Layout::from_records(&records).expect("reload");
        assert_eq!(reloaded.to_records(), records);
        assert_eq!(reloaded.parent(shelf), Some(ContainerRef::Zone(aisle)));

        let mut reloaded = reloaded;
        let fresh = reloaded.add_zone(ContainerRef::Root).expect("add");
        assert!(fresh > shelf);
    }

    fn record(json: serde_json::Value) -> Vec<ZoneRecord> {
        serde_json::from_value(json).expect("records")
    }

    #[test]
    fn from_records_rejects_duplicate_ids_across_levels() {
        let records = record(serde_json::json!([
            { "id": 1, "name": "a", "x": 0, "y": 0, "width": 50, "height": 50,
              "children": [ { "id": 1, "name": "b", "x": 0, "y": 0, "width": 50, "height": 50 } ] }
        ]));
        assert_eq!(Layout::from_records(&records), Err(LayoutError::DuplicateZone(1.into())));
    }

    #[test]
    fn from_records_rejects_incomplete_and_conflicting_grids() {
        let incomplete = record(serde_json::json!([
            { "id": 1, "x": 0, "y": 0, "width": 50, "height": 50, "gridSize": { "rows": 1, "cols": 1 } }
        ]));
        assert_eq!(Layout::from_records(&incomplete), Err(LayoutError::IncompleteGrid(1.into())));

        let conflicting = record(serde_json::json!([
            { "id": 1, "x": 0, "y": 0, "width": 50, "height": 50,
              "gridSize": { "rows": 1, "cols": 1 },
              "subCells": [ { "id": 5, "row": 0, "col": 0, "name": "only" } ],
              "children": [ { "id": 2, "x": 0, "y": 0, "width": 50, "height": 50 } ] }
        ]));
        assert_eq!(
            Layout::from_records(&conflicting),
            Err(LayoutError::ConflictingContent(1.into()))
        );
    }

    #[test]
    fn from_records_clamps_undersized_zones() {
        let records = record(serde_json::json!([
            { "id": 9, "x": -20, "y": 0, "width": 1, "height": 1 }
        ]));
        let layout = Layout::from_records(&records).expect("load");
        let rect = layout.zone(9.into()).expect("zone").rect();
        assert_eq!((rect.x, rect.width, rect.height), (-20.0, 40.0, 30.0));
    }
}
