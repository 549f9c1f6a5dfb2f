// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Row mapping tests against realistic and edge-case payloads.

mod common;

use serde_json::json;
use strava_runs_sync::models::ActivityDetail;
use strava_runs_sync::services::map_to_row;

fn detail(value: serde_json::Value) -> ActivityDetail {
    ActivityDetail::from_json(value).expect("valid detail")
}

#[test]
fn test_documented_example() {
    let row = map_to_row(&detail(json!({
        "id": 555,
        "distance": 5000,
        "moving_time": 1500,
        "has_heartrate": false,
        "average_heartrate": 150
    })));

    assert_eq!(row.strava_workout_id, 555);
    assert_eq!(row.distance, Some(5000.0));
    assert_eq!(row.moving_time, Some(1500));
    assert_eq!(row.average_pace, Some(5000.0 / 1500.0));
    assert!(!row.has_heartrate);
    assert_eq!(row.average_heartrate, None);
}

#[test]
fn test_zero_moving_time_has_no_pace() {
    let row = map_to_row(&detail(json!({
        "id": 1,
        "distance": 1234.5,
        "moving_time": 0
    })));

    assert_eq!(row.average_pace, None);
    assert_eq!(row.moving_time, Some(0));
}

#[test]
fn test_heartrate_kept_when_present() {
    let row = map_to_row(&detail(json!({
        "id": 2,
        "has_heartrate": true,
        "average_heartrate": 151.3,
        "max_heartrate": 178.0
    })));

    assert!(row.has_heartrate);
    assert_eq!(row.average_heartrate, Some(151.3));
    assert_eq!(row.max_heartrate, Some(178.0));
}

#[test]
fn test_stale_sensor_values_nulled() {
    let row = map_to_row(&detail(json!({
        "id": 3,
        "has_heartrate": false,
        "average_heartrate": 0.0,
        "max_heartrate": 0.0,
        "has_power": false,
        "average_watts": 0.0,
        "max_watts": 250,
        "average_cadence": 80.0,
        "max_cadence": 92.0
    })));

    assert_eq!(row.average_heartrate, None);
    assert_eq!(row.max_heartrate, None);
    assert_eq!(row.average_watts, None);
    assert_eq!(row.max_watts, None);
    assert_eq!(row.average_cadence, None);
    assert_eq!(row.max_cadence, None);
}

#[test]
fn test_power_gated_independently_of_heartrate() {
    let row = map_to_row(&detail(json!({
        "id": 4,
        "has_heartrate": false,
        "average_heartrate": 140.0,
        "has_power": true,
        "average_watts": 212.5,
        "max_watts": 640.0,
        "average_cadence": 88.0
    })));

    assert_eq!(row.average_heartrate, None);
    assert_eq!(row.average_watts, Some(212.5));
    assert_eq!(row.max_watts, Some(640.0));
    assert_eq!(row.average_cadence, Some(88.0));
}

#[test]
fn test_missing_optional_fields_defaulted() {
    let row = map_to_row(&detail(json!({ "id": 5 })));

    assert_eq!(row.description, "");
    assert_eq!(row.map_summary_polyline, "");
    assert_eq!(row.name, None);
    assert_eq!(row.start_latlng, None);
    assert_eq!(row.laps, None);
    assert_eq!(row.raw_data, json!({ "id": 5 }));

    // Absent values are explicit nulls, not missing keys.
    let value = serde_json::to_value(&row).unwrap();
    assert!(value.get("device_name").unwrap().is_null());
    assert!(value.get("average_pace").unwrap().is_null());
    assert_eq!(value["description"], "");
}

#[test]
fn test_fixture_mapping() {
    let raw = common::fixture_detail_json();
    let row = map_to_row(&detail(raw.clone()));

    assert_eq!(row.strava_workout_id, 12993214870);
    assert_eq!(row.external_id.as_deref(), Some("garmin_ping_327761946542"));
    assert_eq!(row.upload_id, Some(13888915617));
    assert_eq!(row.start_date.as_deref(), Some("2024-11-26T20:04:11Z"));
    assert_eq!(row.utc_offset, Some(-28800.0));
    assert_eq!(row.location_city, None);
    assert_eq!(row.location_country.as_deref(), Some("United States"));
    assert_eq!(row.start_latlng, Some(vec![37.4, -122.11]));
    assert_eq!(row.map_summary_polyline, "ki{eFvqfiVsBmA`Feh@");
    assert_eq!(row.average_pace, Some(10241.3 / 3122.0));
    assert_eq!(row.average_heartrate, Some(148.2));
    assert_eq!(row.max_heartrate, Some(171.0));
    assert!(!row.has_power);
    assert_eq!(row.average_watts, None);
    assert_eq!(row.max_watts, None);
    assert_eq!(row.average_cadence, Some(83.6));
    assert_eq!(row.activity_type.as_deref(), Some("Run"));
    assert_eq!(row.description, "Easy loop along the creek");
    assert_eq!(row.device_name.as_deref(), Some("Garmin Forerunner 965"));
    assert_eq!(row.kudos_count, Some(7));
    assert_eq!(row.private, Some(false));
    assert_eq!(row.laps.as_ref().unwrap()[0]["name"], "Lap 1");
    assert_eq!(row.splits_metric.as_ref().unwrap().as_array().unwrap().len(), 2);
    assert_eq!(row.raw_data, raw);
}

#[test]
fn test_mapping_is_idempotent() {
    let input = detail(common::fixture_detail_json());

    let first = map_to_row(&input);
    let second = map_to_row(&input);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}
