mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use ene_analytics::infrastructure::files::CsvSurveyRepository;
use ene_analytics::state::AppState;
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = TestServer::new(common::create_test_app(common::create_test_state())).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["source"]["status"], "ok");
    assert_eq!(json["checks"]["source"]["message"], "memory reachable");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = TestServer::new(common::create_test_app(common::create_test_state())).unwrap();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("source").is_some());
}

#[tokio::test]
async fn test_health_endpoint_degraded_without_data() {
    let repo = CsvSurveyRepository::new("tests/fixtures/does-not-exist");
    let state = AppState::new(Arc::new(repo), "csv");
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["source"]["status"], "error");
}
