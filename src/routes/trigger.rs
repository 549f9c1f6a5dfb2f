// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync trigger.
//!
//! `POST` on any path runs one sync and answers when it finishes. Anything
//! else is a 404 and never reaches Strava or the row store.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::State,
    http::{Method, Uri},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Body of a successful trigger.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct SyncResponse {
    pub status: String,
}

/// Run one sync (fallback handler for every path).
pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<Json<SyncResponse>> {
    if method != Method::POST {
        tracing::debug!(method = %method, path = %uri.path(), "Ignoring non-POST request");
        return Err(AppError::NotFound(format!("{} {}", method, uri.path())));
    }

    tracing::info!(path = %uri.path(), "Sync triggered over HTTP");

    // Per-activity failures are in the logs, not in the response.
    state.sync.run().await?;

    Ok(Json(SyncResponse {
        status: "synced".to_string(),
    }))
}
