mod common;

use chrono::{Duration, Utc};
use common::{TestContext, bearer};
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn test_logs_most_recent_first_with_pagination() {
    let ctx = TestContext::new();
    let user_id = Uuid::now_v7();
    let token = ctx.user_token(user_id);
    let link = ctx.links.insert(user_id, "https://example.com", "logs000");

    let start = Utc::now() - Duration::hours(1);
    for i in 0..12 {
        ctx.click_logs.insert_visit(
            link.id,
            start + Duration::minutes(i),
            &format!("203.0.113.{i}"),
        );
    }

    let server = ctx.server();
    let response = server
        .get(&format!("/api/v1/url/{}/logs", link.id))
        .add_query_param("page_size", 10)
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["pagination"]["total_items"], 12);
    assert_eq!(json["pagination"]["total_pages"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 10);
    assert_eq!(json["items"][0]["client_ip"], "203.0.113.11");

    let second = server
        .get(&format!("/api/v1/url/{}/logs", link.id))
        .add_query_param("page", 2)
        .add_query_param("page_size", 10)
        .add_header("Authorization", bearer(&token))
        .await
        .json::<Value>();
    assert_eq!(second["items"].as_array().unwrap().len(), 2);
    assert_eq!(second["items"][1]["client_ip"], "203.0.113.0");
}

#[tokio::test]
async fn test_logs_empty_for_new_link() {
    let ctx = TestContext::new();
    let user_id = Uuid::now_v7();
    let token = ctx.user_token(user_id);
    let link = ctx.links.insert(user_id, "https://example.com", "fresh00");

    let response = ctx
        .server()
        .get(&format!("/api/v1/url/{}/logs", link.id))
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["pagination"]["total_items"], 0);
    assert_eq!(json["items"], serde_json::json!([]));
}

#[tokio::test]
async fn test_logs_invalid_pagination_is_bad_request() {
    let ctx = TestContext::new();
    let user_id = Uuid::now_v7();
    let token = ctx.user_token(user_id);
    let link = ctx.links.insert(user_id, "https://example.com", "pages00");
    let server = ctx.server();
    let path = format!("/api/v1/url/{}/logs", link.id);

    server
        .get(&path)
        .add_query_param("page", 0)
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_bad_request();

    server
        .get(&path)
        .add_query_param("page_size", 5)
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_logs_of_foreign_link_are_not_found() {
    let ctx = TestContext::new();
    let link = ctx
        .links
        .insert(Uuid::now_v7(), "https://example.com", "theirs0");
    ctx.click_logs.insert_visit(link.id, Utc::now(), "203.0.113.7");
    let stranger = ctx.user_token(Uuid::now_v7());

    ctx.server()
        .get(&format!("/api/v1/url/{}/logs", link.id))
        .add_header("Authorization", bearer(&stranger))
        .await
        .assert_status_not_found();
}
