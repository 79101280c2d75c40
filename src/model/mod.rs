// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A layout is a forest of zones; each zone is a leaf, a container of child zones, or a grid
//! of named cells. Geometry and the JSON wire records live alongside.

pub mod color;
pub mod geometry;
pub mod ids;
pub mod layout;
pub mod record;
pub mod zone;

pub use color::{UnknownColorError, ZoneColor};
pub use geometry::{Offset, Point, Rect, Size, Viewport};
pub use ids::{CellId, Id, IdSequence, ZoneId};
pub use layout::{ContainerRef, Layout, LayoutError};
pub use record::{count_zones, CellRecord, ZoneRecord};
pub use zone::{Zone, ZoneContent};
