//! Fallback and static serving tests

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;

use crate::common::{test_config, test_server};
use xfchat::backend::server::{config::ServerConfig, init::create_app};

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let server = test_server();

    let response = server.get("/does/not/exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Route not found");

    let api = server.get("/api/nothing-here").await;
    assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_frontend_with_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>xfchat</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

    let config = ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..test_config()
    };
    let (app, _state) = create_app(config);
    let server = TestServer::new(app).unwrap();

    let asset = server.get("/app.js").await;
    assert_eq!(asset.status_code(), StatusCode::OK);
    assert_eq!(asset.text(), "console.log('hi')");

    let page = server.get("/chat/some-user").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert_contains!(page.text(), "xfchat");

    let api = server.get("/api/nothing-here").await;
    assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
}
