// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence gateway service.
//!
//! `GET /load-zones` answers the saved forest (`[]` before the first save). `POST /save-zones`
//! validates the posted forest and replaces the store file. Writes are serialized through one
//! async mutex; file I/O runs on the blocking pool.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::model::layout::{Layout, LayoutError};
use crate::model::record::{count_zones, ZoneRecord};
use crate::store::{LayoutFile, StoreError};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<LayoutFile>>,
}

#[derive(Debug, Serialize)]
struct SaveReply {
    status: &'static str,
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("invalid layout: {0}")]
    Invalid(#[from] LayoutError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Body(_) | Self::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(err = %self, "request failed");
        } else {
            tracing::warn!(err = %self, "rejected request");
        }
        (status, self.to_string()).into_response()
    }
}

pub fn router(store: LayoutFile) -> Router {
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/load-zones", get(load_zones))
        .route("/save-zones", post(save_zones))
        .with_state(state)
        .layer(cors)
}

/// Serves the gateway on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: tokio::net::TcpListener,
    store: LayoutFile,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, store = %store.path().display(), "gateway listening");
    }
    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn load_zones(State(state): State<AppState>) -> Result<Json<Vec<ZoneRecord>>, ServerError> {
    let store = state.store.lock().await;
    let file = store.clone();
    let records = tokio::task::spawn_blocking(move || file.load()).await??;
    tracing::debug!(zones = count_zones(&records), "served layout");
    Ok(Json(records))
}

async fn save_zones(
    State(state): State<AppState>,
    body: Result<Json<Vec<ZoneRecord>>, JsonRejection>,
) -> Result<Json<SaveReply>, ServerError> {
    let Json(records) = body?;
    // Store the normalized forest; sizes below the minimum are clamped on the way in.
    let records = Layout::from_records(&records)?.to_records();

    let store = state.store.lock().await;
    let file = store.clone();
    let zones = count_zones(&records);
    tokio::task::spawn_blocking(move || file.save(&records)).await??;
    drop(store);

    tracing::info!(zones, "layout saved");
    Ok(Json(SaveReply { status: "saved" }))
}
