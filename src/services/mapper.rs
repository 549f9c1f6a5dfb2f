// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maps a detailed Strava activity onto the `runs` row schema.
//!
//! Derivation rules:
//! - most fields are copied by name
//! - `average_pace` is `distance / moving_time`, null when moving time is zero
//! - heart-rate fields are kept only when `has_heartrate`, power fields only
//!   when `has_power`, cadence only when either sensor flag is set
//! - missing description and polyline become empty strings

use crate::models::{ActivityDetail, NormalizedRunRow};

/// Build the normalized row for one activity. Pure and total.
pub fn map_to_row(detail: &ActivityDetail) -> NormalizedRunRow {
    let has_heartrate = detail.has_heartrate;
    let has_power = detail.has_power;
    let has_sensor = has_heartrate || has_power;

    NormalizedRunRow {
        strava_workout_id: detail.id,
        external_id: detail.external_id.clone(),
        upload_id: detail.upload_id,
        start_date: detail.start_date.clone(),
        start_date_local: detail.start_date_local.clone(),
        utc_offset: detail.utc_offset,
        timezone: detail.timezone.clone(),
        location_city: detail.location_city.clone(),
        location_state: detail.location_state.clone(),
        location_country: detail.location_country.clone(),
        start_latlng: detail.start_latlng.clone(),
        end_latlng: detail.end_latlng.clone(),
        map_summary_polyline: detail.summary_polyline().unwrap_or_default().to_string(),
        moving_time: detail.moving_time,
        elapsed_time: detail.elapsed_time,
        distance: detail.distance,
        average_speed: detail.average_speed,
        max_speed: detail.max_speed,
        average_pace: average_pace(detail.distance, detail.moving_time),
        has_heartrate,
        average_heartrate: gated(has_heartrate, detail.average_heartrate),
        max_heartrate: gated(has_heartrate, detail.max_heartrate),
        has_power,
        average_watts: gated(has_power, detail.average_watts),
        max_watts: gated(has_power, detail.max_watts),
        average_cadence: gated(has_sensor, detail.average_cadence),
        max_cadence: gated(has_sensor, detail.max_cadence),
        total_elevation_gain: detail.total_elevation_gain,
        trainer: detail.trainer,
        commute: detail.commute,
        manual: detail.manual,
        private: detail.private,
        flagged: detail.flagged,
        activity_type: detail.activity_type.clone(),
        name: detail.name.clone(),
        description: detail.description.clone().unwrap_or_default(),
        device_name: detail.device_name.clone(),
        gear_id: detail.gear_id.clone(),
        achievement_count: detail.achievement_count,
        kudos_count: detail.kudos_count,
        comment_count: detail.comment_count,
        photos: detail.photos.clone(),
        laps: detail.laps.clone(),
        splits_metric: detail.splits_metric.clone(),
        splits_standard: detail.splits_standard.clone(),
        elev_high: detail.elev_high,
        elev_low: detail.elev_low,
        embed_token: detail.embed_token.clone(),
        raw_data: detail.raw().clone(),
    }
}

/// Meters per second of moving time. Never divides by zero.
fn average_pace(distance: Option<f64>, moving_time: Option<u64>) -> Option<f64> {
    match (distance, moving_time) {
        (Some(distance), Some(secs)) if secs > 0 => Some(distance / secs as f64),
        _ => None,
    }
}

fn gated(present: bool, value: Option<f64>) -> Option<f64> {
    if present {
        value
    } else {
        None
    }
}
