// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized row written to the `runs` table.

use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Column names of the `runs` table, in declaration order.
///
/// Must match the serialized field names of [`NormalizedRunRow`].
pub const RUN_COLUMNS: &[&str] = &[
    "strava_workout_id",
    "external_id",
    "upload_id",
    "start_date",
    "start_date_local",
    "utc_offset",
    "timezone",
    "location_city",
    "location_state",
    "location_country",
    "start_latlng",
    "end_latlng",
    "map_summary_polyline",
    "moving_time",
    "elapsed_time",
    "distance",
    "average_speed",
    "max_speed",
    "average_pace",
    "has_heartrate",
    "average_heartrate",
    "max_heartrate",
    "has_power",
    "average_watts",
    "max_watts",
    "average_cadence",
    "max_cadence",
    "total_elevation_gain",
    "trainer",
    "commute",
    "manual",
    "private",
    "flagged",
    "type",
    "name",
    "description",
    "device_name",
    "gear_id",
    "achievement_count",
    "kudos_count",
    "comment_count",
    "photos",
    "laps",
    "splits_metric",
    "splits_standard",
    "elev_high",
    "elev_low",
    "embed_token",
    "raw_data",
];

/// One activity as stored in `runs`. Replaced wholesale on every sync.
///
/// Absent values serialize as explicit `null` so an upsert always overwrites
/// every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "bindings/")
)]
pub struct NormalizedRunRow {
    /// Strava activity ID (unique key)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub strava_workout_id: u64,
    pub external_id: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub upload_id: Option<u64>,
    pub start_date: Option<String>,
    pub start_date_local: Option<String>,
    pub utc_offset: Option<f64>,
    pub timezone: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub start_latlng: Option<Vec<f64>>,
    pub end_latlng: Option<Vec<f64>>,
    /// Empty string when the activity has no map
    pub map_summary_polyline: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub moving_time: Option<u64>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub elapsed_time: Option<u64>,
    pub distance: Option<f64>,
    pub average_speed: Option<f64>,
    pub max_speed: Option<f64>,
    /// `distance / moving_time` (m/s); null when moving time is zero
    pub average_pace: Option<f64>,
    pub has_heartrate: bool,
    pub average_heartrate: Option<f64>,
    pub max_heartrate: Option<f64>,
    pub has_power: bool,
    pub average_watts: Option<f64>,
    pub max_watts: Option<f64>,
    pub average_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub total_elevation_gain: Option<f64>,
    pub trainer: Option<bool>,
    pub commute: Option<bool>,
    pub manual: Option<bool>,
    pub private: Option<bool>,
    pub flagged: Option<bool>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub name: Option<String>,
    /// Empty string when Strava has no description
    pub description: String,
    pub device_name: Option<String>,
    pub gear_id: Option<String>,
    pub achievement_count: Option<u32>,
    pub kudos_count: Option<u32>,
    pub comment_count: Option<u32>,
    pub photos: Option<Value>,
    pub laps: Option<Value>,
    pub splits_metric: Option<Value>,
    pub splits_standard: Option<Value>,
    pub elev_high: Option<f64>,
    pub elev_low: Option<f64>,
    pub embed_token: Option<String>,
    /// Full detail payload as received
    pub raw_data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tables::CONFLICT_KEY;

    #[test]
    fn test_columns_match_serialized_fields() {
        let row = NormalizedRunRow {
            strava_workout_id: 1,
            external_id: None,
            upload_id: None,
            start_date: None,
            start_date_local: None,
            utc_offset: None,
            timezone: None,
            location_city: None,
            location_state: None,
            location_country: None,
            start_latlng: None,
            end_latlng: None,
            map_summary_polyline: String::new(),
            moving_time: None,
            elapsed_time: None,
            distance: None,
            average_speed: None,
            max_speed: None,
            average_pace: None,
            has_heartrate: false,
            average_heartrate: None,
            max_heartrate: None,
            has_power: false,
            average_watts: None,
            max_watts: None,
            average_cadence: None,
            max_cadence: None,
            total_elevation_gain: None,
            trainer: None,
            commute: None,
            manual: None,
            private: None,
            flagged: None,
            activity_type: None,
            name: None,
            description: String::new(),
            device_name: None,
            gear_id: None,
            achievement_count: None,
            kudos_count: None,
            comment_count: None,
            photos: None,
            laps: None,
            splits_metric: None,
            splits_standard: None,
            elev_high: None,
            elev_low: None,
            embed_token: None,
            raw_data: Value::Null,
        };

        let value = serde_json::to_value(&row).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), RUN_COLUMNS.len());
        for column in RUN_COLUMNS {
            assert!(object.contains_key(*column), "missing column {}", column);
        }
        assert!(RUN_COLUMNS.contains(&CONFLICT_KEY));
    }
}
