//! Carbonico - estimate the carbon footprint of your digital habits.
//!
//! # Overview
//!
//! Carbonico turns a day of self-reported digital activity (streaming, social
//! media, email, cloud storage, video calls) into grams of CO₂, relatable
//! equivalents and a few suggestions, and keeps each user's results for a
//! leaderboard and a personal history.
//!
//! # API Endpoints
//!
//! - `POST /api/estimate` - Estimate a footprint without storing it
//! - `GET /api/equivalents` - Equivalents of a footprint in grams
//! - `POST /api/calculations` - Compute and store a footprint for a user
//! - `GET /api/calculations` - List stored calculations
//! - `GET /api/leaderboard` - Users ranked by average footprint
//! - `GET /api/users/recent` - Most recently active users
//! - `GET /api/users/:username/history` - A user's history and trend
//! - `GET /api/hello`, `GET /health` - Liveness checks

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use carbonico::api::{AppState, cors_layer, router};
use carbonico::config::Config;
use carbonico::estimator::FootprintEstimator;
use carbonico::factors::EmissionFactors;
use carbonico::storage::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("carbonico=info".parse()?))
        .init();

    let config = Config::from_env();

    info!(port = config.port, db_url = %config.database_url, "Starting Carbonico server");

    // Initialize storage
    let storage = Storage::new(&config.database_url).await?;
    info!("Database initialized");

    // Emission factors are fixed for the lifetime of the process
    let estimator = FootprintEstimator::new(EmissionFactors::STANDARD);

    let state = AppState { storage, estimator };

    let app = router(state).layer(cors_layer(&config.allowed_origins));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, origins = ?config.allowed_origins, "Carbonico is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
