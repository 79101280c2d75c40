// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas rendering: zones of the open container, their cell grids and the rubber band.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Widget};

use crate::editor::Editor;
use crate::model::geometry::{Rect as CanvasRect, Viewport};
use crate::model::zone::Zone;

pub(crate) const SELECTION_COLOR: Color = Color::Rgb(0x00, 0x7b, 0xff);
const ZONE_TEXT_COLOR: Color = Color::Black;
const CELL_BORDER_COLOR: Color = Color::Rgb(0xaa, 0xaa, 0xaa);
const RESIZER_SYMBOL: &str = "◢";

/// Terminal cells whose centers fall inside a rectangle in device units (relative to
/// `area`), at least one cell wide and tall, clipped to `area`.
pub(crate) fn device_cells(device: CanvasRect, area: Rect) -> Option<Rect> {
    let left = f64::from(area.x) + device.x.round();
    let top = f64::from(area.y) + device.y.round();
    let right = f64::from(area.x) + device.right().round().max(device.x.round() + 1.0);
    let bottom = f64::from(area.y) + device.bottom().round().max(device.y.round() + 1.0);
    if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
        return None;
    }

    let x0 = left.max(f64::from(area.left()));
    let y0 = top.max(f64::from(area.top()));
    let x1 = right.min(f64::from(area.right()));
    let y1 = bottom.min(f64::from(area.bottom()));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0 as u16, y0 as u16, (x1 - x0) as u16, (y1 - y0) as u16))
}

fn zone_style(zone: &Zone) -> Style {
    let (r, g, b) = zone.color().rgb();
    Style::default().bg(Color::Rgb(r, g, b)).fg(ZONE_TEXT_COLOR)
}

pub(crate) struct CanvasView<'a> {
    pub(crate) editor: &'a Editor,
    pub(crate) viewport: Viewport,
}

impl CanvasView<'_> {
    fn cells_for(&self, canvas: CanvasRect, area: Rect) -> Option<Rect> {
        device_cells(self.viewport.rect_to_device(canvas), area)
    }

    fn render_zone(&self, zone: &Zone, area: Rect, buf: &mut Buffer) {
        let Some(cells) = self.cells_for(zone.rect(), area) else {
            return;
        };
        let selected = self.editor.selected_zones().contains(&zone.id());
        let cell_mode = self.editor.cell_target() == Some(zone.id());
        let style = zone_style(zone);

        Clear.render(cells, buf);
        buf.set_style(cells, style);

        let (border_type, border_style) = if selected || cell_mode {
            (BorderType::Thick, style.fg(SELECTION_COLOR))
        } else {
            (BorderType::Plain, style)
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style)
            .style(style);
        if !zone.name().is_empty() {
            block = block.title(Line::from(zone.name().to_owned()));
        }
        if !zone.children().is_empty() {
            block = block.title_bottom(Line::from(format!("{} inside", zone.children().len())));
        }
        block.render(cells, buf);

        if let Some(grid) = zone.grid() {
            for cell in grid.cells() {
                let Some(cell_area) = self.cells_for(grid.cell_rect(cell, zone.rect()), area)
                else {
                    continue;
                };
                let picked = cell_mode && self.editor.selected_cells().contains(&cell.id());
                let (border_type, border_style) = if picked {
                    (BorderType::Thick, style.fg(SELECTION_COLOR))
                } else {
                    (BorderType::Plain, style.fg(CELL_BORDER_COLOR))
                };
                let label_style = if picked {
                    style.add_modifier(Modifier::BOLD)
                } else {
                    style
                };
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(border_style)
                    .title(Line::styled(cell.name().to_owned(), label_style))
                    .render(cell_area, buf);
            }
        }

        let corner = (cells.right().saturating_sub(1), cells.bottom().saturating_sub(1));
        if let Some(symbol) = buf.cell_mut(corner) {
            symbol
                .set_symbol(RESIZER_SYMBOL)
                .set_style(style.fg(SELECTION_COLOR));
        }
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for zone in self.editor.active_zones() {
            self.render_zone(zone, area, buf);
        }

        if let Some(band) = self.editor.gesture().selection_rect() {
            if let Some(cells) = self.cells_for(band, area) {
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SELECTION_COLOR))
                    .render(cells, buf);
            }
        }
    }
}
