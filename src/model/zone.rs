// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::color::ZoneColor;
use super::geometry::{Offset, Point, Rect, Size};
use super::ids::ZoneId;
use crate::grid::Grid;

pub const MIN_ZONE_WIDTH: f64 = 40.0;
pub const MIN_ZONE_HEIGHT: f64 = 30.0;
pub const DEFAULT_ZONE_ORIGIN: Point = Point::new(50.0, 50.0);
pub const DEFAULT_ZONE_SIZE: Size = Size::new(120.0, 80.0);
/// Name given back to a zone whose grid is reset while it has no name.
pub const DEFAULT_ZONE_NAME: &str = "Zone";

/// What a zone holds besides its own rectangle.
///
/// Child zones and a cell grid are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ZoneContent {
    #[default]
    Leaf,
    Container(Vec<ZoneId>),
    Grid(Grid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: ZoneId,
    name: String,
    rect: Rect,
    color: ZoneColor,
    content: ZoneContent,
}

impl Zone {
    pub fn new(id: ZoneId, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            rect: clamp_size(rect),
            color: ZoneColor::default(),
            content: ZoneContent::Leaf,
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn origin(&self) -> Point {
        self.rect.origin()
    }

    /// Positions are not clamped; zones may be dragged off the visible canvas.
    pub fn set_origin(&mut self, origin: Point) {
        self.rect.x = origin.x;
        self.rect.y = origin.y;
    }

    pub fn set_size(&mut self, size: Size) {
        self.rect = clamp_size(Rect::from_origin_size(self.rect.origin(), size));
    }

    /// Grows (or shrinks) the zone, never below the minimum size.
    pub fn resize_by(&mut self, delta: Offset) {
        self.set_size(Size::new(
            self.rect.width + delta.dx,
            self.rect.height + delta.dy,
        ));
    }

    pub fn color(&self) -> ZoneColor {
        self.color
    }

    pub fn set_color(&mut self, color: ZoneColor) {
        self.color = color;
    }

    pub fn content(&self) -> &ZoneContent {
        &self.content
    }

    pub(crate) fn set_content(&mut self, content: ZoneContent) {
        self.content = content;
    }

    pub fn children(&self) -> &[ZoneId] {
        match &self.content {
            ZoneContent::Container(children) => children,
            ZoneContent::Leaf | ZoneContent::Grid(_) => &[],
        }
    }

    pub fn grid(&self) -> Option<&Grid> {
        match &self.content {
            ZoneContent::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut Grid> {
        match &mut self.content {
            ZoneContent::Grid(grid) => Some(grid),
            _ => None,
        }
    }

    pub fn has_grid(&self) -> bool {
        self.grid().is_some()
    }
}

fn clamp_size(rect: Rect) -> Rect {
    Rect::new(
        rect.x,
        rect.y,
        sanitize(rect.width).max(MIN_ZONE_WIDTH),
        sanitize(rect.height).max(MIN_ZONE_HEIGHT),
    )
}

// NaN would slip through `max`; treat it as "no size".
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
