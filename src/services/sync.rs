// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync orchestrator.
//!
//! One run:
//! 1. Refresh the access token (fatal on failure)
//! 2. List the most recent activities (fatal on failure)
//! 3. For each activity, strictly in order: fetch detail, map, upsert
//!
//! A failure in step 3 is recorded against that activity and the loop moves
//! on; one bad activity never costs the rest of the batch.

use crate::db::RowStore;
use crate::error::AppError;
use crate::models::AccessCredential;
use crate::services::mapper::map_to_row;
use crate::services::strava::ActivitySource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lifecycle of a single run, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Authenticating,
    Listing,
    ProcessingItem(usize),
    Done,
    FatalError,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::Idle => write!(f, "idle"),
            SyncState::Authenticating => write!(f, "authenticating"),
            SyncState::Listing => write!(f, "listing"),
            SyncState::ProcessingItem(i) => write!(f, "processing_item({})", i),
            SyncState::Done => write!(f, "done"),
            SyncState::FatalError => write!(f, "fatal_error"),
        }
    }
}

/// One activity that could not be synced.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub activity_id: u64,
    /// Error code, e.g. `strava_error` or `persistence_error`
    pub code: &'static str,
    pub error: String,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Summaries returned by the list call
    pub listed: usize,
    /// Rows successfully upserted
    pub synced: usize,
    pub failures: Vec<ItemFailure>,
}

/// Drives the pipeline end to end.
pub struct SyncService {
    source: Arc<dyn ActivitySource>,
    store: Arc<dyn RowStore>,
    refresh_token: String,
    page_size: u32,
    /// Serializes runs within this process (HTTP trigger vs. scheduled tick).
    run_lock: Mutex<()>,
}

impl SyncService {
    pub fn new(
        source: Arc<dyn ActivitySource>,
        store: Arc<dyn RowStore>,
        refresh_token: String,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            store,
            refresh_token,
            page_size,
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one sync run.
    ///
    /// Returns `Err` only for run-level failures (token refresh or listing).
    /// Per-activity failures are logged and listed in the report.
    pub async fn run(&self) -> Result<SyncReport, AppError> {
        let _guard = self.run_lock.lock().await;
        let started_at = Utc::now();
        let mut state = SyncState::Idle;

        advance(&mut state, SyncState::Authenticating);
        let credential = match self.source.refresh_token(&self.refresh_token).await {
            Ok(c) => c,
            Err(e) => return Err(fail(&mut state, e)),
        };

        if credential.refresh_token_rotated(&self.refresh_token) {
            // Not persisted: the configured refresh token keeps being used.
            tracing::warn!(
                "Strava issued a new refresh token; update STRAVA_REFRESH_TOKEN before the old one is revoked"
            );
        }

        advance(&mut state, SyncState::Listing);
        let summaries = match self
            .source
            .list_activities(&credential, self.page_size)
            .await
        {
            Ok(s) => s,
            Err(e) => return Err(fail(&mut state, e)),
        };
        tracing::info!(listed = summaries.len(), "Fetched activity list");

        let mut synced = 0;
        let mut failures = Vec::new();

        for (i, summary) in summaries.iter().enumerate() {
            advance(&mut state, SyncState::ProcessingItem(i));

            match self.sync_activity(&credential, summary.id).await {
                Ok(()) => synced += 1,
                Err(e) => {
                    tracing::error!(
                        activity_id = summary.id,
                        code = e.code(),
                        error = %e,
                        "Failed to sync activity"
                    );
                    failures.push(ItemFailure {
                        activity_id: summary.id,
                        code: e.code(),
                        error: e.to_string(),
                    });
                }
            }
        }

        advance(&mut state, SyncState::Done);

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            listed: summaries.len(),
            synced,
            failures,
        };

        if report.failures.is_empty() {
            tracing::info!(listed = report.listed, synced, "Sync run complete");
        } else {
            tracing::warn!(
                listed = report.listed,
                synced,
                failed = report.failures.len(),
                "Sync run complete with failures"
            );
        }

        Ok(report)
    }

    /// Fetch, map and upsert one activity.
    async fn sync_activity(
        &self,
        credential: &AccessCredential,
        activity_id: u64,
    ) -> Result<(), AppError> {
        let detail = self.source.get_activity(credential, activity_id).await?;
        let row = map_to_row(&detail);
        self.store.upsert(&row).await?;

        tracing::debug!(activity_id, "Activity synced");
        Ok(())
    }
}

fn advance(state: &mut SyncState, next: SyncState) {
    tracing::debug!(from = %state, to = %next, "Sync state transition");
    *state = next;
}

fn fail(state: &mut SyncState, error: AppError) -> AppError {
    tracing::error!(stage = %state, code = error.code(), error = %error, "Sync run aborted");
    *state = SyncState::FatalError;
    error
}
