//! Integration tests for Carbonico API endpoints.
//!
//! These tests verify the full request/response cycle through the HTTP API.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_test::TestServer;
use serde_json::{Value, json};
use tower::ServiceExt;

use carbonico::api::{AppState, router};
use carbonico::estimator::FootprintEstimator;
use carbonico::storage::Storage;

async fn create_state() -> AppState {
    let storage = Storage::new("sqlite::memory:").await.unwrap();
    AppState {
        storage,
        estimator: FootprintEstimator::default(),
    }
}

async fn create_test_server() -> TestServer {
    TestServer::new(router(create_state().await)).unwrap()
}

fn activities(streaming_hours: f64, video_quality: &str) -> Value {
    json!({
        "streamingHours": streaming_hours,
        "videoQuality": video_quality,
        "socialMediaHours": 0,
        "emailsPerDay": 0,
        "cloudStorageGB": 0,
        "videoCallsHours": 0
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_hello_endpoint() {
    let app = router(create_state().await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Hello from backend!");
}

#[tokio::test]
async fn test_estimate_reference_example() {
    let server = create_test_server().await;

    let response = server
        .post("/api/estimate")
        .json(&json!({
            "streamingHours": 2,
            "videoQuality": "hd",
            "socialMediaHours": 1.5,
            "emailsPerDay": 15,
            "cloudStorageGB": 5,
            "videoCallsHours": 1
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["carbonFootprintGrams"], 83.0);

    let driving = body["equivalents"]["drivingKm"].as_f64().unwrap();
    assert!((driving - 83.0 * 0.12).abs() < 1e-9);

    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(
        suggestions[0]["title"],
        "Download instead of streaming repeatedly"
    );
    assert_eq!(suggestions[0]["impactPercent"], 35);
}

#[tokio::test]
async fn test_estimate_heavy_4k() {
    let server = create_test_server().await;

    let response = server
        .post("/api/estimate")
        .json(&activities(5.0, "4k"))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["carbonFootprintGrams"], 490.0);
    assert_eq!(body["suggestions"][0]["title"], "Lower streaming quality");
    assert_eq!(body["suggestions"][0]["impactPercent"], 60);
}

#[tokio::test]
async fn test_estimate_rejects_unknown_quality() {
    let server = create_test_server().await;

    let response = server
        .post("/api/estimate")
        .json(&activities(2.0, "8k"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_estimate_rejects_overflowing_activities() {
    let server = create_test_server().await;

    // Overflows to infinity
    let response = server
        .post("/api/estimate")
        .json(&activities(1e308, "4k"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Infinity minus infinity is NaN
    let mut inf_minus_inf = activities(1e308, "4k");
    inf_minus_inf["videoCallsHours"] = json!(-1e308);
    let response = server.post("/api/estimate").json(&inf_minus_inf).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("finite"));
}

#[tokio::test]
async fn test_overflowing_calculation_is_not_stored() {
    let server = create_test_server().await;

    let mut inf_minus_inf = activities(1e308, "4k");
    inf_minus_inf["videoCallsHours"] = json!(-1e308);

    for payload in [activities(1e308, "4k"), inf_minus_inf] {
        server
            .post("/api/calculations")
            .json(&json!({
                "username": "alice",
                "activities": payload
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    let body: Value = server.get("/api/calculations").await.json();
    assert!(body.as_array().unwrap().is_empty());

    let body: Value = server.get("/api/leaderboard").await.json();
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_equivalents_rejects_non_finite_grams() {
    let server = create_test_server().await;

    let response = server.get("/api/equivalents?grams=inf").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_equivalents_endpoint() {
    let server = create_test_server().await;

    let response = server.get("/api/equivalents?grams=100").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!((body["drivingKm"].as_f64().unwrap() - 12.0).abs() < 1e-9);
    assert!((body["treeDays"].as_f64().unwrap() - 0.55).abs() < 1e-9);
    assert!((body["lightbulbHours"].as_f64().unwrap() - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_post_calculation_computes_footprint() {
    let server = create_test_server().await;

    let response = server
        .post("/api/calculations")
        .json(&json!({
            "username": "  alice  ",
            // Client-side values are ignored
            "carbonFootprint": 1.0,
            "activities": activities(2.0, "hd")
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["username"], "alice");
    assert_eq!(body["carbonFootprint"], 72.0);
    assert_eq!(body["activities"]["videoQuality"], "hd");
    assert!(body["id"].as_i64().is_some());
    assert!(body["date"].is_string());
}

#[tokio::test]
async fn test_post_calculation_rejects_blank_username() {
    let server = create_test_server().await;

    let response = server
        .post("/api/calculations")
        .json(&json!({
            "username": "   ",
            "activities": activities(1.0, "sd")
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn test_get_calculations_empty() {
    let server = create_test_server().await;

    let response = server.get("/api/calculations").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_leaderboard_default_limit() {
    let server = create_test_server().await;

    let response = server.get("/api/leaderboard").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["limit"], 10);
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_workflow() {
    let server = create_test_server().await;

    // 1. Health check
    server.get("/health").await.assert_status_ok();

    // 2. Save calculations for several users
    let submissions = [
        ("alice", 4.0, "4k"),
        ("bob", 1.0, "sd"),
        ("alice", 1.0, "hd"),
        ("carol", 2.0, "hd"),
    ];
    for (username, hours, quality) in submissions {
        server
            .post("/api/calculations")
            .json(&json!({
                "username": username,
                "activities": activities(hours, quality)
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    // 3. All calculations, newest first
    let response = server.get("/api/calculations").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let all = body.as_array().unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0]["username"], "carol");

    // 4. Leaderboard: bob 8, carol 72, alice (392 + 36) / 2 = 214
    let response = server.get("/api/leaderboard?limit=2").await;
    response.assert_status_ok();
    let body: Value = response.json();
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["username"], "bob");
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["username"], "carol");

    let response = server.get("/api/leaderboard").await;
    let body: Value = response.json();
    let alice = &body["entries"][2];
    assert_eq!(alice["username"], "alice");
    assert_eq!(alice["calculationsCount"], 2);
    assert_eq!(alice["averageFootprint"], 214.0);
    assert_eq!(alice["bestFootprint"], 36.0);

    // 5. Alice's history is oldest first and trending down
    let response = server.get("/api/users/alice/history").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["trend"], "down");
    let history = body["calculations"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["carbonFootprint"], 392.0);
    assert_eq!(history[1]["carbonFootprint"], 36.0);

    // 6. Recent users, most recent first
    let response = server.get("/api/users/recent?limit=2").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["usernames"], json!(["carol", "alice"]));
}

#[tokio::test]
async fn test_history_unknown_user() {
    let server = create_test_server().await;

    let response = server.get("/api/users/nobody/history").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["trend"], "neutral");
    assert!(body["calculations"].as_array().unwrap().is_empty());
}
