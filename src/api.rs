//! HTTP API handlers for Carbonico.
//!
//! All bodies are JSON with camelCase field names. Footprints submitted for
//! storage are always recomputed on the server, so stored values stay
//! consistent with the estimator.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::estimator::FootprintEstimator;
use crate::leaderboard::{compute_leaderboard, recent_users, user_history};
use crate::model::{
    ActivityRecord, Calculation, CalculationRequest, Equivalents, EquivalentsQuery,
    EstimationResult, LeaderboardQuery, LeaderboardResponse, NewCalculation, RecentUsersQuery,
    RecentUsersResponse, UserHistory, normalize_username,
};
use crate::storage::Storage;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub estimator: FootprintEstimator,
}

/// Build the application router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/hello", get(hello))
        .route("/api/estimate", post(post_estimate))
        .route("/api/equivalents", get(get_equivalents))
        .route("/api/calculations", get(get_calculations).post(post_calculation))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/users/recent", get(get_recent_users))
        .route("/api/users/:username/history", get(get_user_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the browser frontend.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// JSON has no representation for NaN or infinity, and SQLite turns NaN
/// into NULL, so such footprints are refused before they reach either.
fn ensure_finite(carbon_grams: f64) -> Result<(), ApiError> {
    if carbon_grams.is_finite() {
        Ok(())
    } else {
        warn!(footprint = carbon_grams, "Rejected non-finite footprint");
        Err(ApiError::NonFiniteFootprint)
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /api/hello - Liveness message for the frontend.
pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello from backend!" }))
}

/// POST /api/estimate - Estimate a footprint without storing it.
///
/// # Request Body
///
/// ```json
/// {
///     "streamingHours": 2,
///     "videoQuality": "hd",
///     "socialMediaHours": 1.5,
///     "emailsPerDay": 15,
///     "cloudStorageGB": 5,
///     "videoCallsHours": 1
/// }
/// ```
///
/// An unknown `videoQuality` is rejected with `422 Unprocessable Entity`,
/// and activities whose footprint overflows with `400 Bad Request`.
#[instrument(skip(state, activity))]
pub async fn post_estimate(
    State(state): State<AppState>,
    Json(activity): Json<ActivityRecord>,
) -> Result<Json<EstimationResult>, ApiError> {
    let result = state.estimator.estimate(&activity);
    ensure_finite(result.carbon_footprint_grams)?;

    info!(
        video_quality = %activity.video_quality,
        footprint = result.carbon_footprint_grams,
        suggestions = result.suggestions.len(),
        "Footprint estimated"
    );

    Ok(Json(result))
}

/// GET /api/equivalents?grams=100 - Real-world equivalents of a footprint.
#[instrument(skip(state))]
pub async fn get_equivalents(
    State(state): State<AppState>,
    Query(query): Query<EquivalentsQuery>,
) -> Result<Json<Equivalents>, ApiError> {
    ensure_finite(query.grams)?;
    Ok(Json(state.estimator.get_equivalents(query.grams)))
}

/// POST /api/calculations - Compute and store a footprint for a user.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice",
///     "activities": { "streamingHours": 2, "videoQuality": "hd", ... }
/// }
/// ```
///
/// # Response
///
/// Returns `201 Created` with the stored calculation.
#[instrument(skip(state, request), fields(username))]
pub async fn post_calculation(
    State(state): State<AppState>,
    Json(request): Json<CalculationRequest>,
) -> Result<(StatusCode, Json<Calculation>), ApiError> {
    let username = normalize_username(&request.username).map_err(|reason| {
        warn!(reason, "Rejected calculation");
        ApiError::InvalidUsername(reason)
    })?;
    tracing::Span::current().record("username", username.as_str());

    let carbon_footprint = state.estimator.estimate_footprint(&request.activities);
    ensure_finite(carbon_footprint)?;

    let calculation = NewCalculation {
        carbon_footprint,
        username,
        date: Utc::now(),
        activities: request.activities,
    };

    match state.storage.insert_calculation(&calculation).await {
        Ok(saved) => {
            info!(
                id = saved.id,
                footprint = saved.carbon_footprint,
                "Calculation saved"
            );
            Ok((StatusCode::CREATED, Json(saved)))
        }
        Err(e) => {
            warn!(error = %e, "Failed to save calculation");
            Err(ApiError::Storage("Failed to save calculation"))
        }
    }
}

/// GET /api/calculations - All stored calculations, newest first.
#[instrument(skip(state))]
pub async fn get_calculations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Calculation>>, ApiError> {
    match state.storage.list_calculations().await {
        Ok(calculations) => {
            info!(count = calculations.len(), "Calculations listed");
            Ok(Json(calculations))
        }
        Err(e) => {
            warn!(error = %e, "Failed to list calculations");
            Err(ApiError::Storage("Failed to fetch calculations"))
        }
    }
}

/// GET /api/leaderboard - Users ranked by average footprint.
///
/// # Query Parameters
///
/// - `limit` (optional): Maximum number of entries (default: 10, max: 100)
#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    match compute_leaderboard(&state.storage, query.limit).await {
        Ok(response) => {
            info!(entries = response.entries.len(), "Leaderboard queried");
            Ok(Json(response))
        }
        Err(e) => {
            warn!(error = %e, "Failed to compute leaderboard");
            Err(ApiError::Storage("Failed to compute leaderboard"))
        }
    }
}

/// GET /api/users/recent - Most recently active usernames.
///
/// # Query Parameters
///
/// - `limit` (optional): Maximum number of usernames (default: 5, max: 50)
#[instrument(skip(state))]
pub async fn get_recent_users(
    State(state): State<AppState>,
    Query(query): Query<RecentUsersQuery>,
) -> Result<Json<RecentUsersResponse>, ApiError> {
    recent_users(&state.storage, query.limit)
        .await
        .map(Json)
        .map_err(|e| {
            warn!(error = %e, "Failed to list recent users");
            ApiError::Storage("Failed to fetch recent users")
        })
}

/// GET /api/users/:username/history - A user's calculations with their trend.
#[instrument(skip(state))]
pub async fn get_user_history(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserHistory>, ApiError> {
    let username = normalize_username(&username).map_err(ApiError::InvalidUsername)?;

    match user_history(&state.storage, &username).await {
        Ok(history) => {
            info!(
                count = history.calculations.len(),
                trend = ?history.trend,
                "User history queried"
            );
            Ok(Json(history))
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch user history");
            Err(ApiError::Storage("Failed to fetch user history"))
        }
    }
}
