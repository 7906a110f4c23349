//! Loading server configurations from disk and serving them.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use serene::http_server::{HttpServer, ServerConfig};
use serene::rest_api::RestError;
use serene::store::MemoryStore;
use tempfile::TempDir;
use tower::ServiceExt;

fn demo_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("scrum.json")
}

async fn call(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[test]
fn test_demo_config_verifies() {
    let config = ServerConfig::load(demo_config_path()).unwrap();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let models = config.verify().unwrap();
    assert_eq!(models.len(), 3);

    let server = HttpServer::new(config, Arc::new(MemoryStore::new())).unwrap();
    let paths: Vec<&str> = server.routes().iter().map(|r| r.path.as_str()).collect();
    assert!(paths.contains(&"/projects"));
    assert!(paths.contains(&"/projects/:parent_key/stories"));
    assert!(paths.contains(&"/scrum/stories/:key"));
}

#[tokio::test]
async fn test_demo_config_serves_projects_and_stories() {
    let config = ServerConfig::load(demo_config_path()).unwrap();
    let router = HttpServer::new(config, Arc::new(MemoryStore::new()))
        .unwrap()
        .router();

    let (status, project) = call(
        &router,
        Request::post("/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"number": 1, "name": "Apple"}).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_key = project["key"].as_str().unwrap().to_string();

    for (number, title) in [(2, "Grow"), (1, "Eat")] {
        let (status, _) = call(
            &router,
            Request::post(format!("/projects/{}/stories", project_key))
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("number={}&title={}", number, title)))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stories) = call(
        &router,
        Request::get(format!("/projects/{}/stories", project_key))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = stories
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Eat", "Grow"]);
}

#[tokio::test]
async fn test_missing_required_project_name() {
    let config = ServerConfig::load(demo_config_path()).unwrap();
    let router = HttpServer::new(config, Arc::new(MemoryStore::new()))
        .unwrap()
        .router();

    let (status, body) = call(
        &router,
        Request::post("/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"number": 1}).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_string());
}

#[test]
fn test_config_from_tempfile() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("serene.json");
    fs::write(
        &path,
        r#"{
            "port": 9090,
            "cors_origins": ["http://localhost:5173"],
            "models": [
                {"kind": "Tag", "properties": [{"name": "label", "type": "string", "required": true}]}
            ],
            "routes": [
                {"path": "/tags", "kind": "collection", "handler": {"model": "Tag", "order_by": ["label"]}}
            ]
        }"#,
    )
    .unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.socket_addr(), "0.0.0.0:9090");
    let server = HttpServer::new(config, Arc::new(MemoryStore::new())).unwrap();
    assert_eq!(server.routes().len(), 1);
}

#[test]
fn test_conflicting_routes_rejected() {
    let config = ServerConfig::from_json(
        r#"{
            "models": [{"kind": "Tag"}],
            "routes": [
                {"path": "/tags", "kind": "collection", "handler": {"model": "Tag"}},
                {"path": "/tags", "kind": "collection", "handler": {"model": "Tag"}}
            ]
        }"#,
    )
    .unwrap();

    let result = HttpServer::new(config, Arc::new(MemoryStore::new()));
    assert!(matches!(result, Err(RestError::Configuration(_))));
}

#[test]
fn test_unknown_order_by_rejected() {
    let config = ServerConfig::from_json(
        r#"{
            "models": [{"kind": "Tag", "properties": [{"name": "label", "type": "string"}]}],
            "routes": [
                {"path": "/tags", "kind": "collection", "handler": {"model": "Tag", "order_by": ["colour"]}}
            ]
        }"#,
    )
    .unwrap();

    assert!(matches!(config.verify(), Err(RestError::Configuration(_))));
}
