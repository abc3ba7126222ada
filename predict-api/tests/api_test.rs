//! HTTP-level tests driving the router in-process

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use predict_api::{handlers::HealthResponse, ApiServer};
use serde_json::{json, Value};
use spam_classifier::{dataset, training, Config, ModelBundle, ModelState};
use tempfile::TempDir;
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:3000";

/// Helper to build a router around a model trained on the synthetic corpus
fn loaded_router() -> Router {
    let pipeline = training::fit(&dataset::synthetic(), &Config::default()).unwrap();
    let state: ModelState = ModelBundle::new(pipeline.model, pipeline.vectorizer)
        .unwrap()
        .into();
    ApiServer::new(state, "127.0.0.1:0".to_string(), ORIGIN.to_string()).router()
}

/// Helper to build a router from a config whose artifact files do not exist
fn unloaded_router(dir: &TempDir) -> Router {
    let mut config = Config::default();
    config.paths.model = dir.path().join("model.json");
    config.paths.vectorizer = dir.path().join("vectorizer.json");

    let server = ApiServer::from_config(&config);
    assert!(!server.model_loaded());
    server.router()
}

fn predict_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_root_is_always_up() {
    let dir = TempDir::new().unwrap();

    for router in [loaded_router(), unloaded_router(&dir)] {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Spam Prediction API is running"}));
    }
}

#[tokio::test]
async fn test_predict_spam() {
    let (status, body) = send(
        loaded_router(),
        predict_request(json!({"message": "Win a free lottery now!"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": "Spam", "is_spam": true}));
}

#[tokio::test]
async fn test_predict_ham() {
    let (status, body) = send(
        loaded_router(),
        predict_request(json!({"message": "Can we talk later?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"prediction": "Ham", "is_spam": false}));
}

#[tokio::test]
async fn test_predict_without_model_returns_500() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(
        unloaded_router(&dir),
        predict_request(json!({"message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "Model not loaded"}));
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let (status, _) = send(loaded_router(), predict_request(json!({"text": "hi"}))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let dir = TempDir::new().unwrap();

    let (status, body) = send(
        loaded_router(),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        health,
        HealthResponse {
            status: "healthy".to_string(),
            service: "predict-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model_loaded: true,
        }
    );

    let (_, body) = send(
        unloaded_router(&dir),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert!(!health.model_loaded);
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = loaded_router().oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let request = Request::get("/")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = loaded_router().oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_service_loads_trained_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.paths.dataset = dir.path().join("missing.csv");
    config.paths.model = dir.path().join("model.json");
    config.paths.vectorizer = dir.path().join("vectorizer.json");
    training::train(&config).unwrap();

    let server = ApiServer::from_config(&config);
    assert!(server.model_loaded());

    let (status, body) = send(
        server.router(),
        predict_request(json!({"message": "Click here to claim your prize"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_spam"], json!(true));
}
