// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Load/save boundary for the zone forest.
//!
//! The editor talks to a `LayoutGateway`: either the HTTP service (`HttpGateway`) or the JSON
//! file directly (`LayoutFile`). Saves go through `SaveQueue` so the editor never blocks on I/O.

mod http;
mod save_queue;

pub use http::{HttpGateway, DEFAULT_SERVER_URL};
pub use save_queue::{SaveOutcome, SaveQueue};

use crate::model::record::ZoneRecord;
use crate::store::{LayoutFile, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub trait LayoutGateway: Send + Sync {
    fn load(&self) -> Result<Vec<ZoneRecord>, GatewayError>;

    fn save(&self, records: &[ZoneRecord]) -> Result<(), GatewayError>;

    /// Where the layout lives, for status lines and logs.
    fn describe(&self) -> String;
}

impl LayoutGateway for LayoutFile {
    fn load(&self) -> Result<Vec<ZoneRecord>, GatewayError> {
        Ok(LayoutFile::load(self)?)
    }

    fn save(&self, records: &[ZoneRecord]) -> Result<(), GatewayError> {
        Ok(LayoutFile::save(self, records)?)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
