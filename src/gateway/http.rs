// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use super::{GatewayError, LayoutGateway};
use crate::model::record::ZoneRecord;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Blocking client for the `/load-zones` and `/save-zones` endpoints.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SaveReply {
    status: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn check(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(GatewayError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

impl LayoutGateway for HttpGateway {
    fn load(&self) -> Result<Vec<ZoneRecord>, GatewayError> {
        let url = self.endpoint("load-zones");
        let response = Self::check(self.client.get(&url).send()?)?;
        let records: Vec<ZoneRecord> = response.json()?;
        tracing::debug!(%url, roots = records.len(), "loaded layout");
        Ok(records)
    }

    fn save(&self, records: &[ZoneRecord]) -> Result<(), GatewayError> {
        let url = self.endpoint("save-zones");
        let response = Self::check(self.client.post(&url).json(records).send()?)?;
        let reply: SaveReply = response.json()?;
        tracing::debug!(%url, status = %reply.status, roots = records.len(), "saved layout");
        Ok(())
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
