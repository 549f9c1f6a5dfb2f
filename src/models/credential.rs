// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Short-lived Strava access credential, held in memory for one sync run.

use chrono::{DateTime, Utc};
use std::fmt;

/// Access token obtained by refreshing the configured refresh token.
///
/// Never persisted. One credential is obtained per run and reused for every
/// Strava call within it.
#[derive(Clone)]
pub struct AccessCredential {
    pub token: String,
    pub obtained_at: DateTime<Utc>,
    /// Expiry reported by Strava, if any
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token returned by the exchange. Strava may rotate it; the
    /// pipeline surfaces it but does not store it.
    pub rotated_refresh_token: Option<String>,
}

impl AccessCredential {
    /// Whether Strava handed back a different refresh token than `current`.
    pub fn refresh_token_rotated(&self, current: &str) -> bool {
        self.rotated_refresh_token
            .as_deref()
            .is_some_and(|t| t != current)
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
