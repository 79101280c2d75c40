// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer gestures and the transient overlays driven by them.

use crate::model::color::ZoneColor;
use crate::model::geometry::{Point, Rect};
use crate::model::ids::{CellId, ZoneId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl-click: add or remove a zone from the selection instead of replacing it.
    pub toggle: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { toggle: false };
    pub const TOGGLE: Self = Self { toggle: true };
}

/// What lies under a canvas point in the active container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Resizer(ZoneId),
    Zone(ZoneId),
    Canvas,
}

impl HitTarget {
    pub fn zone(self) -> Option<ZoneId> {
        match self {
            Self::Resizer(id) | Self::Zone(id) => Some(id),
            Self::Canvas => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Zones move to `origin + (pointer - start)`; `start` never moves, so repeated moves
    /// cannot accumulate drift.
    DraggingZones {
        start: Point,
        origins: Vec<(ZoneId, Point)>,
    },
    Marquee {
        start: Point,
        current: Point,
    },
    /// `last` is reset on every move; each move applies only its own delta.
    Resizing {
        zone: ZoneId,
        last: Point,
    },
    CellPress {
        zone: ZoneId,
        start: Point,
    },
    CellMarquee {
        zone: ZoneId,
        start: Point,
        current: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The rubber band to draw, if a marquee is in progress.
    pub fn selection_rect(&self) -> Option<Rect> {
        match self {
            Self::Marquee { start, current } | Self::CellMarquee { start, current, .. } => {
                Some(Rect::from_corners(*start, *current))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub anchor: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Delete,
    Recolor(ZoneColor),
    SplitIntoCells,
    /// Destructive; front-ends confirm before issuing it.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptField {
    #[default]
    Rows,
    Cols,
}

/// Raw text of the "split into cells" dialog. Parsed only on submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridPrompt {
    pub rows: String,
    pub cols: String,
    pub field: PromptField,
}

impl GridPrompt {
    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            PromptField::Rows => &mut self.rows,
            PromptField::Cols => &mut self.cols,
        }
    }

    pub fn push(&mut self, ch: char) {
        self.focused_mut().push(ch);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            PromptField::Rows => PromptField::Cols,
            PromptField::Cols => PromptField::Rows,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    Zone(ZoneId),
    Cell { zone: ZoneId, cell: CellId },
}

/// An inline rename in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub target: TextTarget,
    pub buffer: String,
}

impl TextEdit {
    pub fn push(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }
}
