// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness-Tracker API Server
//!
//! Serves dashboards, feeds and group leaderboards computed from logged
//! workouts and meals.

use fitness_tracker::{
    config::Config,
    db::{ActivityRepository, GroupRepository, MemoryStore},
    services::BackendClient,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        streak_policy = ?config.streak_policy,
        tz_offset_minutes = config.tz_offset_minutes,
        "Starting Fitness-Tracker API"
    );

    let (activities, groups): (Arc<dyn ActivityRepository>, Arc<dyn GroupRepository>) =
        match &config.backend_url {
            Some(url) => {
                tracing::info!(backend = %url, "Using remote backend");
                let client = Arc::new(BackendClient::new(url.clone(), config.backend_token.clone()));
                let activities: Arc<dyn ActivityRepository> = client.clone();
                let groups: Arc<dyn GroupRepository> = client;
                (activities, groups)
            }
            None => {
                tracing::warn!("BACKEND_URL not set, using in-memory store");
                let store = Arc::new(MemoryStore::new());
                let activities: Arc<dyn ActivityRepository> = store.clone();
                let groups: Arc<dyn GroupRepository> = store;
                (activities, groups)
            }
        };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), activities, groups));

    // Build router
    let app = fitness_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitness_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
