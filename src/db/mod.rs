// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row store for normalized runs.
//!
//! Two backends implement [`RowStore`]:
//! - `SupabaseStore`: Supabase/PostgREST over HTTP (production)
//! - `SqliteStore`: local SQLite via sqlx (development and tests)

pub mod sqlite;
pub mod supabase;

pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;

use crate::config::StoreConfig;
use crate::error::AppError;
use crate::models::NormalizedRunRow;
use async_trait::async_trait;
use std::sync::Arc;

/// Table and key names.
pub mod tables {
    pub const RUNS: &str = "runs";
    /// Unique key of `runs`; the upsert conflict target.
    pub const CONFLICT_KEY: &str = "strava_workout_id";
}

/// Destination for normalized rows.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert the row, or overwrite every column of the existing row with the
    /// same `strava_workout_id`.
    async fn upsert(&self, row: &NormalizedRunRow) -> Result<(), AppError>;
}

/// Build the configured store.
pub async fn connect(
    store: &StoreConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn RowStore>, AppError> {
    match store {
        StoreConfig::Supabase {
            url,
            service_role_key,
        } => {
            tracing::info!(url = %url, "Using Supabase row store");
            Ok(Arc::new(SupabaseStore::new(
                http,
                url,
                service_role_key.clone(),
            )))
        }
        StoreConfig::Sqlite { database_url } => {
            tracing::info!(url = %database_url, "Using SQLite row store");
            Ok(Arc::new(SqliteStore::connect(database_url).await?))
        }
    }
}
