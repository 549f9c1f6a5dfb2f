// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Runs-Sync: keep a `runs` table in step with a Strava account
//!
//! This crate refreshes a Strava access token, pulls the most recent
//! activities with their full detail, normalizes each one into a row and
//! upserts it into Supabase (or a local SQLite database).

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::SyncService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sync: SyncService,
}
