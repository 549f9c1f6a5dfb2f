// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod mapper;
pub mod strava;
pub mod sync;

pub use mapper::map_to_row;
pub use strava::{ActivitySource, StravaClient};
pub use sync::{ItemFailure, SyncReport, SyncService, SyncState};

use crate::error::AppError;
use anyhow::Context;
use std::time::Duration;

/// Shared HTTP client for Strava and Supabase. Every request inherits
/// `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}
