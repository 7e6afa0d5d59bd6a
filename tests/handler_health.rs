mod common;

use common::TestContext;
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoint_success() {
    let ctx = TestContext::new();

    let response = ctx.server().get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_database_is_down() {
    let ctx = TestContext::new();
    ctx.links.set_offline(true);

    let response = ctx.server().get("/health").await;

    assert_eq!(response.status_code(), 503);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_is_closed() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let TestContext { clicks, .. } = ctx;
    drop(clicks);

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    assert_eq!(
        response.json::<Value>()["checks"]["click_queue"]["status"],
        "error"
    );
}
