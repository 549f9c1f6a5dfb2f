// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strava_runs_sync::config::Config;
use strava_runs_sync::db::RowStore;
use strava_runs_sync::error::AppError;
use strava_runs_sync::models::{AccessCredential, ActivityDetail, ActivitySummary, NormalizedRunRow};
use strava_runs_sync::routes::create_router;
use strava_runs_sync::services::{ActivitySource, SyncService};
use strava_runs_sync::AppState;

/// Load the realistic detailed activity fixture.
#[allow(dead_code)]
pub fn fixture_detail_json() -> Value {
    let content = std::fs::read_to_string("tests/fixtures/activity_detail.json")
        .expect("Failed to read fixture");
    serde_json::from_str(&content).expect("Failed to parse fixture")
}

/// Minimal detail payload for one activity.
#[allow(dead_code)]
pub fn detail_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Run {}", id),
        "type": "Run",
        "distance": 5000.0,
        "moving_time": 1500,
        "elapsed_time": 1600,
        "has_heartrate": false
    })
}

/// In-memory activity source with scripted failures.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeSource {
    pub summaries: Vec<u64>,
    pub details: BTreeMap<u64, Value>,
    pub fail_refresh: bool,
    pub fail_list: bool,
    /// Detail calls for these ids fail with `SourceUnavailable`.
    pub fail_detail: HashSet<u64>,
    /// Refresh token handed back by the exchange.
    pub rotated_refresh_token: Option<String>,
    pub refresh_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub detail_calls: Mutex<Vec<u64>>,
}

#[allow(dead_code)]
impl FakeSource {
    /// Source listing `ids`, each with a minimal detail payload.
    pub fn with_activities(ids: &[u64]) -> Self {
        Self {
            summaries: ids.to_vec(),
            details: ids.iter().map(|id| (*id, detail_json(*id))).collect(),
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
            + self.list_calls.load(Ordering::SeqCst)
            + self.detail_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivitySource for FakeSource {
    async fn refresh_token(&self, _refresh_token: &str) -> Result<AccessCredential, AppError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_refresh {
            return Err(AppError::Auth("Token refresh failed with status 401".to_string()));
        }
        Ok(AccessCredential {
            token: "fake_access_token".to_string(),
            obtained_at: Utc::now(),
            expires_at: None,
            rotated_refresh_token: self.rotated_refresh_token.clone(),
        })
    }

    async fn list_activities(
        &self,
        credential: &AccessCredential,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        assert_eq!(credential.token, "fake_access_token");
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list {
            return Err(AppError::SourceUnavailable("HTTP 503".to_string()));
        }
        Ok(self
            .summaries
            .iter()
            .take(per_page as usize)
            .map(|id| ActivitySummary {
                id: *id,
                name: None,
                start_date: None,
            })
            .collect())
    }

    async fn get_activity(
        &self,
        credential: &AccessCredential,
        activity_id: u64,
    ) -> Result<ActivityDetail, AppError> {
        assert_eq!(credential.token, "fake_access_token");
        self.detail_calls.lock().unwrap().push(activity_id);
        if self.fail_detail.contains(&activity_id) {
            return Err(AppError::SourceUnavailable(format!(
                "HTTP 500 for {}",
                activity_id
            )));
        }
        let body = self
            .details
            .get(&activity_id)
            .cloned()
            .ok_or_else(|| AppError::SourceUnavailable("HTTP 404".to_string()))?;
        ActivityDetail::from_json(body).map_err(|e| AppError::MalformedResponse(e.to_string()))
    }
}

/// In-memory row store keyed by activity id.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<BTreeMap<u64, NormalizedRunRow>>,
    /// Upserts for these ids are rejected.
    pub fail_ids: HashSet<u64>,
}

#[allow(dead_code)]
impl FakeStore {
    pub fn ids(&self) -> Vec<u64> {
        self.rows.lock().unwrap().keys().copied().collect()
    }
}

#[async_trait]
impl RowStore for FakeStore {
    async fn upsert(&self, row: &NormalizedRunRow) -> Result<(), AppError> {
        if self.fail_ids.contains(&row.strava_workout_id) {
            return Err(AppError::persistence(
                row.strava_workout_id,
                "duplicate key value violates unique constraint",
            ));
        }
        self.rows
            .lock()
            .unwrap()
            .insert(row.strava_workout_id, row.clone());
        Ok(())
    }
}

/// Sync service over the given fakes.
#[allow(dead_code)]
pub fn sync_service(source: Arc<FakeSource>, store: Arc<FakeStore>) -> SyncService {
    SyncService::new(source, store, "test_refresh_token".to_string(), 30)
}

/// Create a test app over fakes. Returns the router plus the fakes for
/// inspection.
#[allow(dead_code)]
pub fn create_test_app(source: FakeSource) -> (axum::Router, Arc<FakeSource>, Arc<FakeStore>) {
    let source = Arc::new(source);
    let store = Arc::new(FakeStore::default());

    let state = Arc::new(AppState {
        config: Config::test_default(),
        sync: sync_service(source.clone(), store.clone()),
    });

    (create_router(state), source, store)
}
