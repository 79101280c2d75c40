// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Selection and drag engine.
//!
//! `Editor` owns the layout plus everything transient about an editing session: the navigation
//! stack, the zone and cell selections, the gesture in progress and the open overlays. Input
//! arrives as pointer events in canvas coordinates and as explicit commands; every mutation is
//! scoped to the active container. Operations that fail leave all state untouched.

mod gesture;

use std::collections::BTreeSet;

pub use gesture::{
    ContextMenu, Gesture, GridPrompt, HitTarget, MenuCommand, Modifiers, PointerButton,
    PromptField, TextEdit, TextTarget,
};

use crate::grid::{parse_grid_dimensions, Grid, GridError};
use crate::model::color::ZoneColor;
use crate::model::geometry::{Point, Rect, Size};
use crate::model::ids::{CellId, ZoneId};
use crate::model::layout::{ContainerRef, Layout, LayoutError};
use crate::model::record::ZoneRecord;
use crate::model::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Resize handle in a zone's bottom-right corner. Front-ends with coarse pointers widen it
    /// to one pointer cell.
    pub resizer: Size,
    /// Distance a cell press must travel on either axis before it becomes a cell marquee.
    pub cell_drag_threshold: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resizer: Size::new(10.0, 10.0),
            cell_drag_threshold: 3.0,
        }
    }
}

/// How a double-clicked zone was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Container,
    CellEdit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("no zone is selected")]
    NoSelection,
    #[error("no zone is open for cell editing")]
    NoCellTarget,
    #[error("zone {0} is not in the open container")]
    NotInActiveContainer(ZoneId),
    #[error("the grid size prompt is not open")]
    NoPrompt,
}

#[derive(Debug, Clone)]
pub struct Editor {
    layout: Layout,
    config: EditorConfig,
    nav: Vec<ZoneId>,
    selected_zones: BTreeSet<ZoneId>,
    selected_cells: BTreeSet<CellId>,
    cell_target: Option<ZoneId>,
    gesture: Gesture,
    context_menu: Option<ContextMenu>,
    grid_prompt: Option<GridPrompt>,
    text_edit: Option<TextEdit>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Layout::new(), EditorConfig::default())
    }
}

impl Editor {
    pub fn new(layout: Layout, config: EditorConfig) -> Self {
        Self {
            layout,
            config,
            nav: Vec::new(),
            selected_zones: BTreeSet::new(),
            selected_cells: BTreeSet::new(),
            cell_target: None,
            gesture: Gesture::Idle,
            context_menu: None,
            grid_prompt: None,
            text_edit: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> EditorConfig {
        self.config
    }

    /// Zones entered from the root, outermost first.
    pub fn nav_stack(&self) -> &[ZoneId] {
        &self.nav
    }

    pub fn active_container(&self) -> ContainerRef {
        match self.nav.last() {
            Some(id) => ContainerRef::Zone(*id),
            None => ContainerRef::Root,
        }
    }

    /// Zones of the active container, bottom-most first.
    pub fn active_zones(&self) -> Vec<&Zone> {
        self.layout
            .zones_in(self.active_container())
            .unwrap_or_default()
    }

    pub fn selected_zones(&self) -> &BTreeSet<ZoneId> {
        &self.selected_zones
    }

    pub fn selected_cells(&self) -> &BTreeSet<CellId> {
        &self.selected_cells
    }

    pub fn cell_target(&self) -> Option<ZoneId> {
        self.cell_target
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn context_menu(&self) -> Option<ContextMenu> {
        self.context_menu
    }

    pub fn grid_prompt(&self) -> Option<&GridPrompt> {
        self.grid_prompt.as_ref()
    }

    pub fn grid_prompt_mut(&mut self) -> Option<&mut GridPrompt> {
        self.grid_prompt.as_mut()
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        self.text_edit.as_mut()
    }

    /// Snapshot of the whole forest in wire form.
    pub fn records(&self) -> Vec<ZoneRecord> {
        self.layout.to_records()
    }

    /// Swaps in a freshly loaded layout and resets the session to the root.
    pub fn replace_layout(&mut self, layout: Layout) {
        *self = Self::new(layout, self.config);
    }

    // ---- hit testing -------------------------------------------------------------------------

    pub fn hit_test(&self, point: Point) -> HitTarget {
        let handle = self.config.resizer;
        for zone in self.active_zones().into_iter().rev() {
            let rect = zone.rect();
            if !rect.contains_point(point) {
                continue;
            }
            if point.x >= rect.right() - handle.width
                && point.y >= rect.bottom() - handle.height
            {
                return HitTarget::Resizer(zone.id());
            }
            return HitTarget::Zone(zone.id());
        }
        HitTarget::Canvas
    }

    /// The cell of the cell-edit target under `point`.
    pub fn cell_at(&self, point: Point) -> Option<CellId> {
        let zone = self.layout.zone(self.cell_target?)?;
        zone.grid()?.cell_at_point(zone.rect(), point)
    }

    // ---- pointer input -----------------------------------------------------------------------

    pub fn pointer_down(&mut self, point: Point, button: PointerButton, modifiers: Modifiers) {
        if button == PointerButton::Secondary {
            self.context_menu = if self.selected_zones.is_empty() {
                None
            } else {
                Some(ContextMenu { anchor: point })
            };
            return;
        }

        self.context_menu = None;
        self.blur_text_edit();

        let hit = self.hit_test(point);
        if let Some(target) = self.cell_target {
            if hit.zone() == Some(target) {
                self.gesture = Gesture::CellPress {
                    zone: target,
                    start: point,
                };
                return;
            }
            self.selected_cells.clear();
            if hit == HitTarget::Canvas {
                return;
            }
        }

        match hit {
            HitTarget::Resizer(zone) => {
                self.gesture = Gesture::Resizing { zone, last: point };
            }
            HitTarget::Zone(zone) => self.press_zone(zone, point, modifiers),
            HitTarget::Canvas => {
                self.selected_zones.clear();
                self.gesture = Gesture::Marquee {
                    start: point,
                    current: point,
                };
            }
        }
    }

    fn press_zone(&mut self, id: ZoneId, point: Point, modifiers: Modifiers) {
        if modifiers.toggle {
            if !self.selected_zones.remove(&id) {
                self.selected_zones.insert(id);
            }
        } else if !self.selected_zones.contains(&id) {
            self.selected_zones = BTreeSet::from([id]);
        }

        let origins = self
            .active_zones()
            .into_iter()
            .filter(|zone| self.selected_zones.contains(&zone.id()))
            .map(|zone| (zone.id(), zone.origin()))
            .collect();
        self.gesture = Gesture::DraggingZones {
            start: point,
            origins,
        };
    }

    pub fn pointer_move(&mut self, point: Point) {
        let threshold = self.config.cell_drag_threshold;
        let result = match &mut self.gesture {
            Gesture::Idle => Ok(()),
            Gesture::DraggingZones { start, origins } => {
                let offset = start.delta_to(point);
                // All or nothing: a vanished zone abandons the drag before anything moves.
                match origins.iter().find(|(id, _)| self.layout.zone(*id).is_none()) {
                    Some((missing, _)) => Err(LayoutError::UnknownZone(*missing)),
                    None => origins.iter().try_for_each(|(id, origin)| {
                        let target = origin.translate(offset);
                        self.layout.update_zone(*id, |zone| zone.set_origin(target))
                    }),
                }
            }
            Gesture::Marquee { current, .. } | Gesture::CellMarquee { current, .. } => {
                *current = point;
                Ok(())
            }
            Gesture::Resizing { zone, last } => {
                let delta = last.delta_to(point);
                *last = point;
                self.layout.update_zone(*zone, |zone| zone.resize_by(delta))
            }
            Gesture::CellPress { zone, start } => {
                if start.delta_to(point).exceeds(threshold) {
                    self.gesture = Gesture::CellMarquee {
                        zone: *zone,
                        start: *start,
                        current: point,
                    };
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            tracing::warn!(%err, "abandoning gesture");
            self.gesture = Gesture::Idle;
        }
    }

    pub fn pointer_up(&mut self, point: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Marquee { start, .. } => {
                let band = Rect::from_corners(start, point);
                self.selected_zones = self
                    .active_zones()
                    .into_iter()
                    .filter(|zone| zone.rect().intersects(&band))
                    .map(Zone::id)
                    .collect();
            }
            Gesture::CellMarquee { zone, start, .. } => {
                let band = Rect::from_corners(start, point);
                if let Some(zone) = self.layout.zone(zone) {
                    if let Some(grid) = zone.grid() {
                        self.selected_cells = grid.cells_overlapping(zone.rect(), band);
                    }
                }
            }
            Gesture::CellPress { .. } => {
                if let Some(cell) = self.cell_at(point) {
                    if !self.selected_cells.remove(&cell) {
                        self.selected_cells.insert(cell);
                    }
                }
            }
            Gesture::Idle | Gesture::DraggingZones { .. } | Gesture::Resizing { .. } => {}
        }
    }

    /// Double-click: rename a cell of the cell-edit target, or enter a zone.
    pub fn double_click(&mut self, point: Point) -> Result<Option<EntryMode>, EditorError> {
        let hit = self.hit_test(point);
        if hit.zone().is_some() && hit.zone() == self.cell_target {
            if let Some(cell) = self.cell_at(point) {
                self.begin_cell_rename(cell)?;
                return Ok(None);
            }
        }
        match hit.zone() {
            Some(id) => self.enter_zone(id).map(Some),
            None => Ok(None),
        }
    }

    // ---- navigation --------------------------------------------------------------------------

    pub fn enter_zone(&mut self, id: ZoneId) -> Result<EntryMode, EditorError> {
        self.ensure_active(id)?;
        let has_grid = self.layout.zone(id).is_some_and(Zone::has_grid);

        let mode = if has_grid {
            self.cell_target = Some(id);
            EntryMode::CellEdit
        } else {
            self.layout.open_container(id)?;
            self.nav.push(id);
            self.cell_target = None;
            EntryMode::Container
        };

        self.selected_zones.clear();
        self.selected_cells.clear();
        self.context_menu = None;
        self.gesture = Gesture::Idle;
        tracing::debug!(zone = %id, ?mode, "entered zone");
        Ok(mode)
    }

    /// Returns the zone that was left, or `None` when already at the root.
    pub fn exit_zone(&mut self) -> Option<ZoneId> {
        let left = self.nav.pop();
        self.selected_zones.clear();
        self.context_menu = None;
        self.exit_cell_mode();
        left
    }

    pub fn exit_cell_mode(&mut self) {
        self.cell_target = None;
        self.selected_cells.clear();
    }

    // ---- zone commands -----------------------------------------------------------------------

    pub fn add_zone(&mut self) -> Result<ZoneId, EditorError> {
        let container = self.active_container();
        let id = self.layout.add_zone(container)?;
        tracing::debug!(zone = %id, "added zone");
        Ok(id)
    }

    pub fn delete_selected(&mut self) -> Result<Vec<ZoneId>, EditorError> {
        if self.selected_zones.is_empty() {
            return Err(EditorError::NoSelection);
        }
        let container = self.active_container();
        let removed = self.layout.remove_zones(container, &self.selected_zones)?;
        if self
            .cell_target
            .is_some_and(|target| self.layout.zone(target).is_none())
        {
            self.exit_cell_mode();
        }
        self.selected_zones.clear();
        self.context_menu = None;
        tracing::debug!(count = removed.len(), "deleted zones");
        Ok(removed)
    }

    pub fn recolor_selected(&mut self, color: ZoneColor) -> Result<(), EditorError> {
        if self.selected_zones.is_empty() {
            return Err(EditorError::NoSelection);
        }
        let targets: Vec<ZoneId> = self.selected_in_order();
        for id in targets {
            self.layout.update_zone(id, |zone| zone.set_color(color))?;
        }
        self.context_menu = None;
        Ok(())
    }

    pub fn rename_zone(&mut self, id: ZoneId, name: impl Into<String>) -> Result<(), EditorError> {
        self.ensure_active(id)?;
        let name = name.into();
        self.layout.update_zone(id, |zone| zone.set_name(name))?;
        Ok(())
    }

    /// First selected zone in container order.
    pub fn first_selected(&self) -> Option<ZoneId> {
        self.selected_in_order().into_iter().next()
    }

    pub fn dismiss_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn apply_menu(&mut self, command: MenuCommand) -> Result<(), EditorError> {
        self.context_menu = None;
        match command {
            MenuCommand::Delete => self.delete_selected().map(|_| ()),
            MenuCommand::Recolor(color) => self.recolor_selected(color),
            MenuCommand::SplitIntoCells => self.open_grid_prompt(),
            MenuCommand::Reset => {
                let zone = self.first_selected().ok_or(EditorError::NoSelection)?;
                self.reset_grid(zone)
            }
        }
    }

    // ---- grid commands -----------------------------------------------------------------------

    pub fn open_grid_prompt(&mut self) -> Result<(), EditorError> {
        if self.first_selected().is_none() {
            return Err(EditorError::NoSelection);
        }
        self.context_menu = None;
        self.grid_prompt = Some(GridPrompt::default());
        Ok(())
    }

    /// Validates the prompt and divides the first selected zone. On a validation error the
    /// prompt stays open with its text intact.
    pub fn submit_grid_prompt(&mut self) -> Result<ZoneId, EditorError> {
        let prompt = self.grid_prompt.as_ref().ok_or(EditorError::NoPrompt)?;
        let size = parse_grid_dimensions(&prompt.rows, &prompt.cols)?;
        let zone = self.first_selected().ok_or(EditorError::NoSelection)?;
        self.initialize_grid(zone, size.rows, size.cols)?;
        self.grid_prompt = None;
        Ok(zone)
    }

    pub fn cancel_grid_prompt(&mut self) {
        self.grid_prompt = None;
    }

    /// Divides `zone` into `rows x cols` unit cells and clears its name.
    pub fn initialize_grid(&mut self, zone: ZoneId, rows: u32, cols: u32) -> Result<(), EditorError> {
        self.ensure_active(zone)?;
        let grid = Grid::new(rows, cols)?;
        self.layout.install_grid(zone, grid)?;
        if self.cell_target == Some(zone) {
            self.selected_cells.clear();
        }
        tracing::debug!(zone = %zone, rows, cols, "initialized grid");
        Ok(())
    }

    pub fn merge_selected_cells(&mut self) -> Result<CellId, EditorError> {
        let target = self.cell_target.ok_or(EditorError::NoCellTarget)?;
        let selected = &self.selected_cells;
        let merged = self.layout.update_grid(target, |grid| grid.merge(selected))?;
        self.selected_cells.clear();
        Ok(merged)
    }

    pub fn split_selected_cell(&mut self) -> Result<Vec<CellId>, EditorError> {
        let target = self.cell_target.ok_or(EditorError::NoCellTarget)?;
        let selected = &self.selected_cells;
        let created = self
            .layout
            .update_grid(target, |grid| grid.split_selection(selected))?;
        self.selected_cells.clear();
        Ok(created)
    }

    /// Drops the grid of `zone`; an empty name falls back to the default.
    pub fn reset_grid(&mut self, zone: ZoneId) -> Result<(), EditorError> {
        self.ensure_active(zone)?;
        self.layout.clear_grid(zone)?;
        if self.cell_target == Some(zone) {
            self.exit_cell_mode();
        }
        tracing::debug!(zone = %zone, "reset grid");
        Ok(())
    }

    // ---- inline text editing -----------------------------------------------------------------

    pub fn begin_zone_rename(&mut self, id: ZoneId) -> Result<(), EditorError> {
        self.ensure_active(id)?;
        let buffer = self
            .layout
            .zone(id)
            .map(|zone| zone.name().to_owned())
            .unwrap_or_default();
        self.text_edit = Some(TextEdit {
            target: TextTarget::Zone(id),
            buffer,
        });
        Ok(())
    }

    pub fn begin_cell_rename(&mut self, cell: CellId) -> Result<(), EditorError> {
        let zone = self.cell_target.ok_or(EditorError::NoCellTarget)?;
        let buffer = self
            .layout
            .zone(zone)
            .and_then(Zone::grid)
            .and_then(|grid| grid.cell(cell))
            .map(|cell| cell.name().to_owned())
            .ok_or(GridError::UnknownCell(cell))?;
        self.text_edit = Some(TextEdit {
            target: TextTarget::Cell { zone, cell },
            buffer,
        });
        Ok(())
    }

    /// Writes the edit buffer back. Returns what was renamed, if an edit was open.
    pub fn commit_text_edit(&mut self) -> Result<Option<TextTarget>, EditorError> {
        let Some(edit) = self.text_edit.take() else {
            return Ok(None);
        };
        match edit.target {
            TextTarget::Zone(id) => {
                self.layout.update_zone(id, |zone| zone.set_name(edit.buffer))?;
            }
            TextTarget::Cell { zone, cell } => {
                self.layout
                    .update_grid(zone, |grid| grid.rename_cell(cell, edit.buffer))?;
            }
        }
        Ok(Some(edit.target))
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit = None;
    }

    fn blur_text_edit(&mut self) {
        if let Err(err) = self.commit_text_edit() {
            tracing::warn!(%err, "dropping inline edit");
        }
    }

    // ---- helpers -----------------------------------------------------------------------------

    fn selected_in_order(&self) -> Vec<ZoneId> {
        self.layout
            .children(self.active_container())
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.selected_zones.contains(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ensure_active(&self, id: ZoneId) -> Result<(), EditorError> {
        if self.layout.contains(self.active_container(), id) {
            return Ok(());
        }
        if self.layout.zone(id).is_none() {
            return Err(LayoutError::UnknownZone(id).into());
        }
        Err(EditorError::NotInActiveContainer(id))
    }
}
