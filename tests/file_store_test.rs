//! Tests for the score API over the JSON file store

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use score_server::api;
use score_server::state::{AppState, FileScoreStore, ScoreRecord};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn post(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/scores")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_corrupt_file_is_served_as_empty_and_repaired_on_submit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "[{ broken").unwrap();

    let state = AppState::new(Arc::new(FileScoreStore::new(&path))).shared();
    let app = api::router(state);

    let resp = app.clone().oneshot(get("/scores")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"[]");

    let resp = app
        .clone()
        .oneshot(post(r#"{"name":"fixer","alerts":4,"meters":{"damage":2}}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let on_disk: Vec<ScoreRecord> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].name, "fixer");
    assert_eq!(on_disk[0].meters, json!({"damage": 2}));
}

#[tokio::test]
async fn test_missing_file_is_created_on_first_submit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("scores.json");

    let state = AppState::new(Arc::new(FileScoreStore::new(&path))).shared();
    let app = api::router(state);

    let resp = app.clone().oneshot(get("/stats")).await.unwrap();
    let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["totalGames"], 0);

    for (name, alerts) in [("a", 1), ("b", 3), ("c", 2)] {
        let body = json!({"name": name, "alerts": alerts}).to_string();
        let resp = app.clone().oneshot(post(&body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let on_disk: Vec<ScoreRecord> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let names: Vec<&str> = on_disk.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c", "a"]);
}
