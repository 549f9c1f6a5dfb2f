// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - Access token refresh (once per sync run)
//! - Listing the most recent activities (first page only)
//! - Fetching one detailed activity, including all efforts
//!
//! Every request goes through the shared `reqwest::Client`, which carries the
//! per-request timeout.

use crate::config::{DEFAULT_STRAVA_API_URL, DEFAULT_STRAVA_OAUTH_URL};
use crate::error::AppError;
use crate::models::{AccessCredential, ActivityDetail, ActivitySummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where activities come from. Implemented by [`StravaClient`]; tests swap in
/// fakes.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Exchange the long-lived refresh token for an access credential.
    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessCredential, AppError>;

    /// Most recent activities, newest first, at most `per_page` of them.
    async fn list_activities(
        &self,
        credential: &AccessCredential,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError>;

    /// Full record for one activity.
    async fn get_activity(
        &self,
        credential: &AccessCredential,
        activity_id: u64,
    ) -> Result<ActivityDetail, AppError>;
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(http: reqwest::Client, client_id: String, client_secret: String) -> Self {
        Self {
            http,
            base_url: DEFAULT_STRAVA_API_URL.to_string(),
            oauth_url: DEFAULT_STRAVA_OAUTH_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// Point the client at different API and token endpoints.
    pub fn with_endpoints(mut self, base_url: &str, oauth_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self.oauth_url = oauth_url.to_string();
        self
    }

    /// Check response status and return an error if not successful.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AppError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::SourceUnavailable(
                "Strava rate limit exceeded".to_string(),
            ));
        }

        Err(AppError::SourceUnavailable(format!(
            "HTTP {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl ActivitySource for StravaClient {
    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessCredential, AppError> {
        let request = TokenRefreshRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            refresh_token,
        };

        let response = self
            .http
            .post(&self.oauth_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token refresh failed");
            return Err(AppError::Auth(format!(
                "Token refresh failed with status {}",
                status
            )));
        }

        let tokens: TokenRefreshResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {}", e)))?;

        let token = tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth("Token response has no access_token".to_string()))?;

        Ok(AccessCredential {
            token,
            obtained_at: Utc::now(),
            expires_at: tokens
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
            rotated_refresh_token: tokens.refresh_token,
        })
    }

    async fn list_activities(
        &self,
        credential: &AccessCredential,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.token)
            .query(&[("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(transport_error)?;

        let response = self.check_response(response).await?;

        let mut activities: Vec<ActivitySummary> = response
            .json()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("Activity list: {}", e)))?;

        // Strava honors per_page, but never hand more than asked to the loop.
        activities.truncate(per_page as usize);
        Ok(activities)
    }

    async fn get_activity(
        &self,
        credential: &AccessCredential,
        activity_id: u64,
    ) -> Result<ActivityDetail, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.token)
            .query(&[("include_all_efforts", "true")])
            .send()
            .await
            .map_err(transport_error)?;

        let response = self.check_response(response).await?;

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::MalformedResponse(format!("Activity {}: {}", activity_id, e))
        })?;

        let detail = ActivityDetail::from_json(body).map_err(|e| {
            AppError::MalformedResponse(format!("Activity {}: {}", activity_id, e))
        })?;

        if detail.id != activity_id {
            return Err(AppError::MalformedResponse(format!(
                "Requested activity {} but received {}",
                activity_id, detail.id
            )));
        }

        Ok(detail)
    }
}

/// Map a transport-level failure (connect error, timeout) to an unavailable source.
fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::SourceUnavailable(format!("Request timed out: {}", e))
    } else {
        AppError::SourceUnavailable(e.to_string())
    }
}

/// Token refresh request body.
#[derive(Serialize)]
struct TokenRefreshRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    refresh_token: &'a str,
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
}
