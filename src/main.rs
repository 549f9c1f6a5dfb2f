// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Runs-Sync Server
//!
//! Exposes the sync trigger over HTTP and, when `SYNC_INTERVAL_SECS` is set,
//! also runs the sync on a fixed schedule.

use std::sync::Arc;
use std::time::Duration;
use strava_runs_sync::{
    config::Config,
    db,
    services::{http_client, StravaClient, SyncService},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        page_size = config.page_size,
        "Starting Strava-Runs-Sync"
    );

    let http = http_client(config.http_timeout)?;

    let strava = StravaClient::new(
        http.clone(),
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    )
    .with_endpoints(&config.strava_api_url, &config.strava_oauth_url);

    let store = db::connect(&config.store, http).await?;

    let sync = SyncService::new(
        Arc::new(strava),
        store,
        config.strava_refresh_token.clone(),
        config.page_size,
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        sync,
    });

    if let Some(interval) = config.sync_interval {
        tracing::info!(interval_secs = interval.as_secs(), "Scheduled sync enabled");
        tokio::spawn(run_schedule(state.clone(), interval));
    }

    // Build router
    let app = strava_runs_sync::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run a sync every `interval`. The first tick fires one interval after
/// startup. Failures are logged and the schedule keeps going.
async fn run_schedule(state: Arc<AppState>, interval: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        tracing::info!("Scheduled sync starting");
        if let Err(e) = state.sync.run().await {
            tracing::error!(code = e.code(), error = %e, "Scheduled sync failed");
        }
    }
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_runs_sync=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
