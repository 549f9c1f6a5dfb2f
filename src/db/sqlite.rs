// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite row store for local development and tests.
//!
//! Uses the same `runs` column set as Supabase. JSON-valued columns
//! (lat/lng pairs, laps, splits, photos, raw payload) are stored as JSON text.

use crate::db::tables;
use crate::db::RowStore;
use crate::error::AppError;
use crate::models::run::RUN_COLUMNS;
use crate::models::NormalizedRunRow;
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite-backed [`RowStore`].
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    upsert_sql: String,
}

impl SqliteStore {
    /// Open (creating if needed) the database and apply migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid SQLite URL: {}", database_url))?
            .create_if_missing(true);

        // Every connection to `:memory:` is a separate database, so pin the
        // pool to a single connection that never gets recycled.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to open SQLite database")?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, applying migrations.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            pool,
            upsert_sql: upsert_sql(),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn upsert(&self, row: &NormalizedRunRow) -> Result<(), AppError> {
        let activity_id = row.strava_workout_id;

        let mut fields = match serde_json::to_value(row) {
            Ok(Value::Object(fields)) => fields,
            Ok(other) => {
                return Err(AppError::persistence(
                    activity_id,
                    format!("row serialized to {} instead of an object", other),
                ))
            }
            Err(e) => return Err(AppError::persistence(activity_id, e.to_string())),
        };

        let mut query = sqlx::query(&self.upsert_sql);
        for column in RUN_COLUMNS {
            query = bind_json(query, fields.remove(*column).unwrap_or(Value::Null))
                .map_err(|e| AppError::persistence(activity_id, format!("{}: {}", column, e)))?;
        }

        query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence(activity_id, e.to_string()))?;

        tracing::debug!(activity_id, "Row upserted to SQLite");
        Ok(())
    }
}

/// `INSERT … ON CONFLICT DO UPDATE` over every column.
fn upsert_sql() -> String {
    let columns: Vec<String> = RUN_COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect();
    let placeholders = vec!["?"; RUN_COLUMNS.len()].join(", ");
    let updates: Vec<String> = RUN_COLUMNS
        .iter()
        .filter(|c| **c != tables::CONFLICT_KEY)
        .map(|c| format!("\"{c}\" = excluded.\"{c}\""))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT(\"{}\") DO UPDATE SET {}",
        tables::RUNS,
        columns.join(", "),
        placeholders,
        tables::CONFLICT_KEY,
        updates.join(", ")
    )
}

/// Bind one JSON value with its natural SQLite type.
///
/// SQLite integers are 64-bit signed; larger unsigned values are refused
/// rather than stored as lossy REALs.
fn bind_json(query: SqliteQuery<'_>, value: Value) -> Result<SqliteQuery<'_>, String> {
    Ok(match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                let i = i64::try_from(u)
                    .map_err(|_| format!("integer {} does not fit in a SQLite INTEGER", u))?;
                query.bind(i)
            } else if let Some(i) = n.as_i64() {
                query.bind(i)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s),
        json @ (Value::Array(_) | Value::Object(_)) => query.bind(json.to_string()),
    })
}
