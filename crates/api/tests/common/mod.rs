#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cinedash_api::config::{ServerConfig, StoreBackend};
use cinedash_api::router::build_app_router;
use cinedash_api::state::AppState;
use cinedash_db::memory::MemoryMovieStore;
use cinedash_db::store::MovieStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store: StoreBackend::Memory,
        db_max_connections: 1,
    }
}

/// Build the full application router over the given store.
///
/// Uses the same [`build_app_router`] as `main.rs` so integration tests
/// exercise the production middleware stack.
pub fn build_test_app(store: Arc<dyn MovieStore>) -> Router {
    let config = test_config();
    let state = AppState { store };
    build_app_router(state, &config)
}

/// A fresh, empty in-memory store.
pub fn memory_store() -> Arc<dyn MovieStore> {
    Arc::new(MemoryMovieStore::new())
}

/// Send a GET request.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, body.to_string()).await
}

/// Send a POST request with a raw body labelled as JSON.
pub async fn post_raw(app: Router, uri: &str, body: String) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a movie through the API, asserting success.
pub async fn create_movie(
    store: &Arc<dyn MovieStore>,
    title: &str,
    release_date: &str,
    budget: f64,
    worldwide_gross: f64,
) -> serde_json::Value {
    let app = build_test_app(Arc::clone(store));
    let response = post_json(
        app,
        "/movies",
        serde_json::json!({
            "releaseDate": release_date,
            "movieTitle": title,
            "productionBudget": budget,
            "domesticGross": worldwide_gross / 2.0,
            "worldwideGross": worldwide_gross,
        }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["movie"].clone()
}

/// Seed Movie A (2020, 100), Movie B (2020, 300), Movie C (2021, 200).
pub async fn seed_scenario(store: &Arc<dyn MovieStore>) {
    create_movie(store, "Movie A", "2020-02-01", 100.0, 1_000.0).await;
    create_movie(store, "Movie B", "2020-11-01", 300.0, 9_000.0).await;
    create_movie(store, "Movie C", "2021-05-01", 200.0, 4_000.0).await;
}
