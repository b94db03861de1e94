mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (server, state) = common::create_test_server();
    common::add_link(&state, "example.com").await;

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(
        json["checks"]["database"]["message"],
        "Connected, 1 links stored"
    );
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (server, _state) = common::create_test_server();

    let response = server.get("/health").await;

    let json = response.json::<Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("database").is_some());
}
