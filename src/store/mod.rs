// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! On-disk persistence for the zone forest.
//!
//! The store is a single pretty-printed JSON file holding the array of root zone records. Both
//! the gateway service and the terminal editor (in file mode) read and write it.

pub mod layout_file;

pub use layout_file::{LayoutFile, StoreError, WriteDurability, DEFAULT_STORE_PATH};
