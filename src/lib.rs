// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Zoneplan: a floor layout editor for pharmacies.
//!
//! Zones are rectangles on a canvas that nest inside each other or carry a grid of shelf cells.
//! [`editor::Editor`] is the pointer-driven editing engine, [`tui`] puts it on a terminal, and
//! [`gateway`] / [`server`] move the zone forest to and from `zones_layout.json`.

pub mod editor;
pub mod gateway;
pub mod grid;
pub mod model;
pub mod server;
pub mod store;
pub mod tui;

#[cfg(test)]
mod fixtures;
