// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity payloads as received from the API.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::ops::Deref;

/// Summary activity from `GET /athlete/activities`.
///
/// Only the id drives the pipeline; name and start date are kept for logs.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivitySummary {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
}

/// Map block of a detailed activity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivityMap {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary_polyline: Option<String>,
    #[serde(default)]
    pub polyline: Option<String>,
}

/// Typed fields of a detailed Strava activity.
///
/// Every field except `id` is optional: Strava omits or nulls fields
/// depending on device, privacy settings and sport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityFields {
    pub id: u64,
    pub external_id: Option<String>,
    pub upload_id: Option<u64>,

    // ─── Time & place ────────────────────────────────────────────
    pub start_date: Option<String>,
    pub start_date_local: Option<String>,
    pub utc_offset: Option<f64>,
    pub timezone: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    /// `[lat, lng]`, empty when the activity has no GPS
    pub start_latlng: Option<Vec<f64>>,
    pub end_latlng: Option<Vec<f64>>,
    pub map: Option<ActivityMap>,

    // ─── Effort ──────────────────────────────────────────────────
    /// Seconds
    pub moving_time: Option<u64>,
    /// Seconds
    pub elapsed_time: Option<u64>,
    /// Meters
    pub distance: Option<f64>,
    /// Meters per second
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub total_elevation_gain: Option<f64>,
    pub elev_high: Option<f64>,
    pub elev_low: Option<f64>,

    // ─── Sensors ─────────────────────────────────────────────────
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_heartrate: bool,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_power: bool,
    pub average_watts: Option<f64>,
    pub max_watts: Option<f64>,
    pub average_cadence: Option<f64>,
    pub max_cadence: Option<f64>,

    // ─── Flags ───────────────────────────────────────────────────
    pub trainer: Option<bool>,
    pub commute: Option<bool>,
    pub manual: Option<bool>,
    pub private: Option<bool>,
    pub flagged: Option<bool>,

    // ─── Descriptive ─────────────────────────────────────────────
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub device_name: Option<String>,
    pub gear_id: Option<String>,
    pub embed_token: Option<String>,

    // ─── Social ──────────────────────────────────────────────────
    pub achievement_count: Option<u32>,
    pub kudos_count: Option<u32>,
    pub comment_count: Option<u32>,

    // ─── Sub-structures (stored as JSON) ─────────────────────────
    pub photos: Option<Value>,
    pub laps: Option<Value>,
    pub splits_metric: Option<Value>,
    pub splits_standard: Option<Value>,
}

/// Detailed Strava activity from `GET /activities/{id}`.
///
/// Decoding always keeps the full response body for the `raw_data` column,
/// whether through [`ActivityDetail::from_json`] or serde.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ActivityDetail {
    fields: ActivityFields,
    raw: Value,
}

impl ActivityDetail {
    /// Decode a detail response body, keeping the original payload.
    ///
    /// Fails if the body is not an object or a known field has the wrong type.
    pub fn from_json(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = ActivityFields::deserialize(&raw)?;
        Ok(Self { fields, raw })
    }

    /// The response body exactly as Strava returned it.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Summary polyline, if the activity has a map.
    pub fn summary_polyline(&self) -> Option<&str> {
        self.map.as_ref().and_then(|m| m.summary_polyline.as_deref())
    }
}

impl TryFrom<Value> for ActivityDetail {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Self::from_json(raw)
    }
}

impl Deref for ActivityDetail {
    type Target = ActivityFields;

    fn deref(&self) -> &ActivityFields {
        &self.fields
    }
}

/// Presence flags are occasionally sent as `null`; treat that as absent.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
