//! Common test utilities

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use bank_ledger::api::{self, AppState};
use bank_ledger::{Config, LedgerStore};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

/// Fresh in-memory ledger with the schema in place
pub async fn setup_test_store() -> LedgerStore {
    let store = LedgerStore::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory ledger");
    store
        .initialize_schema()
        .await
        .expect("Failed to initialize schema");
    store
}

pub fn test_config(require_auth: bool) -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "REQUIRE_AUTH" => Some(require_auth.to_string()),
        "SESSION_SECRET" => Some("test-secret".to_string()),
        "GITHUB_REPO_URL" => Some("https://example.com/repo".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Router over a fresh ledger
pub async fn setup_test_app(require_auth: bool) -> (Router, LedgerStore) {
    let store = setup_test_store().await;
    let app = api::create_router(AppState::new(store.clone(), test_config(require_auth)));
    (app, store)
}

pub async fn post_form(app: &Router, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
