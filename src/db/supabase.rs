// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) row store.
//!
//! Upserts go to `POST /rest/v1/runs?on_conflict=strava_workout_id` with
//! `Prefer: resolution=merge-duplicates`. The body always carries every
//! column, so a merge overwrites the whole row.

use crate::db::tables;
use crate::db::RowStore;
use crate::error::AppError;
use crate::models::NormalizedRunRow;
use async_trait::async_trait;

/// Supabase REST client authenticated with the service role key.
#[derive(Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_url: String,
    service_role_key: String,
}

impl SupabaseStore {
    pub fn new(http: reqwest::Client, project_url: &str, service_role_key: String) -> Self {
        Self {
            http,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            service_role_key,
        }
    }
}

#[async_trait]
impl RowStore for SupabaseStore {
    async fn upsert(&self, row: &NormalizedRunRow) -> Result<(), AppError> {
        let activity_id = row.strava_workout_id;
        let url = format!("{}/{}", self.rest_url, tables::RUNS);

        let response = self
            .http
            .post(&url)
            .query(&[("on_conflict", tables::CONFLICT_KEY)])
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| AppError::persistence(activity_id, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::persistence(
                activity_id,
                format!("HTTP {}: {}", status, body),
            ));
        }

        tracing::debug!(activity_id, "Row upserted to Supabase");
        Ok(())
    }
}
