mod common;

use axum_test::TestServer;

fn server() -> TestServer {
    TestServer::new(common::create_test_app(common::create_test_state())).unwrap()
}

#[tokio::test]
async fn test_quarters_sorted_with_marks() {
    let response = server().get("/api/quarters").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["index"], 0);
    assert_eq!(items[0]["label"], "Q1 2020");
    assert_eq!(items[1]["label"], "Q2 2020");
    assert!(items[0]["key"].as_i64().unwrap() < items[1]["key"].as_i64().unwrap());
    // First and last positions always carry a tick label.
    assert_eq!(items[0]["mark"], true);
    assert_eq!(items[1]["mark"], true);
}

#[tokio::test]
async fn test_regions_in_source_order() {
    let json = server().get("/api/regions").await.json::<serde_json::Value>();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["value"], "all");
    assert_eq!(items[0]["name"], "All regions");
    assert_eq!(items[0]["codes"], serde_json::json!([]));
    assert_eq!(items[1]["value"], "1");
    assert_eq!(items[1]["name"], "North");
    assert_eq!(items[2]["codes"], serde_json::json!([2]));
}

#[tokio::test]
async fn test_age_brackets_cover_working_age() {
    let json = server()
        .get("/api/age-brackets")
        .await
        .json::<serde_json::Value>();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 12);
    assert_eq!(items[11]["label"], "70+");
}

#[tokio::test]
async fn test_age_groups_default() {
    let json = server()
        .get("/api/age-groups")
        .await
        .json::<serde_json::Value>();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["label"], "15-24");
    assert_eq!(items[0]["brackets"], serde_json::json!([1, 2]));
}
