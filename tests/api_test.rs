//! HTTP API tests driven through the router without binding a socket.

mod common;

use augur::config::Config;
use augur::services::PipelineSettings;
use augur::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(behavior: StubBehavior) -> axum::Router {
    let provider = StubProvider::new(rising_bars(date(2024, 1, 1), 120), behavior);
    let predictor = service(provider, Arc::new(CloseMultiple(1.01)), PipelineSettings::default());
    augur::app(AppState::new(Arc::new(Config::default()), predictor))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_predict_ok() {
    let (status, body) = get(
        app_with(StubBehavior::InRange),
        "/api/predict?asset=Bitcoin&date=2024-04-29",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["asset"], "Bitcoin");
    assert_eq!(body["date"], "2024-04-29");
    assert_eq!(body["current_price"], 219.0);
    assert_eq!(body["signal"], "Buy");
    assert_eq!(body["graphData"]["prices"].as_array().unwrap().len(), 90);
}

#[tokio::test]
async fn test_predict_legacy_path() {
    let (status, body) = get(
        app_with(StubBehavior::InRange),
        "/predict?asset=BTC&date=2024-04-28",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-04-28");
}

#[tokio::test]
async fn test_predict_defaults_to_today() {
    let (status, body) = get(app_with(StubBehavior::Everything), "/api/predict?asset=Bitcoin").await;

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requested_date"], today);
    assert_eq!(body["date"], "2024-04-29");
}

#[tokio::test]
async fn test_predict_missing_asset() {
    let (status, body) = get(app_with(StubBehavior::InRange), "/api/predict?date=2024-04-29").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("asset"));
}

#[tokio::test]
async fn test_predict_unsupported_asset() {
    let (status, body) = get(
        app_with(StubBehavior::InRange),
        "/api/predict?asset=Nonexistent&date=2024-04-29",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Asset not supported: Nonexistent");
}

#[tokio::test]
async fn test_predict_invalid_date() {
    let (status, body) = get(
        app_with(StubBehavior::InRange),
        "/api/predict?asset=Bitcoin&date=2024-02-30",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("2024-02-30"));
}

#[tokio::test]
async fn test_predict_provider_failure_is_server_error() {
    let (status, body) = get(
        app_with(StubBehavior::Fail),
        "/api/predict?asset=Bitcoin&date=2024-04-29",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app_with(StubBehavior::InRange), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["models"], 1);
    assert_eq!(body["source"], "yahoo");
}

#[tokio::test]
async fn test_assets() {
    let (status, body) = get(app_with(StubBehavior::InRange), "/api/assets").await;

    assert_eq!(status, StatusCode::OK);
    let assets = body.as_array().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0]["name"], "Bitcoin");
    assert_eq!(assets[0]["symbol"], "BTC");
    assert_eq!(assets[0]["ticker"], "BTC-USD");
    assert_eq!(assets[0]["model"], "close_multiple");
}
