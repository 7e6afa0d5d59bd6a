//! PostgreSQL click log store tests. Need `DATABASE_URL`; run with `--ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use shortlink_tracker::domain::entities::{
    GeoInfo, LinkStatus, NewClickLog, NewShortLink, ProbeOutcome,
};
use shortlink_tracker::domain::repositories::{ClickLogRepository, LinkRepository};
use shortlink_tracker::infrastructure::persistence::{PgClickLogRepository, PgLinkRepository};

async fn setup(pool: PgPool) -> (PgLinkRepository, PgClickLogRepository, Uuid) {
    let pool = Arc::new(pool);
    let links = PgLinkRepository::new(Arc::clone(&pool));
    let logs = PgClickLogRepository::new(pool);

    let link = links
        .create(NewShortLink {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            long_url: "https://example.com".to_string(),
            short_code: "logs000".to_string(),
            status: LinkStatus::Active,
        })
        .await
        .unwrap();

    (links, logs, link.id)
}

fn visit(link_id: Uuid, minutes_ago: i64) -> NewClickLog {
    NewClickLog {
        id: Uuid::now_v7(),
        link_id,
        visited_at: Utc::now() - Duration::minutes(minutes_ago),
        client_ip: Some("203.0.113.7".to_string()),
        geo: None,
        outcome: None,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_round_trips_enrichment(pool: PgPool) {
    let (_, logs, link_id) = setup(pool).await;

    let mut log = visit(link_id, 0);
    log.geo = Some(GeoInfo {
        country: Some("IN".to_string()),
        city: Some("Bengaluru".to_string()),
    });
    log.outcome = Some(ProbeOutcome {
        http_status_code: 200,
        redirect_status: "200 OK".to_string(),
    });
    logs.create(log.clone()).await.unwrap();

    let stored = logs.list_for_link(link_id, 0, 10).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, log.id);
    assert_eq!(stored[0].geo, log.geo);
    assert_eq!(stored[0].outcome, log.outcome);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_is_idempotent_on_id(pool: PgPool) {
    let (_, logs, link_id) = setup(pool).await;
    let log = visit(link_id, 0);

    logs.create(log.clone()).await.unwrap();
    logs.create(log).await.unwrap();

    assert_eq!(logs.count_for_link(link_id).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_most_recent_first_with_offset(pool: PgPool) {
    let (_, logs, link_id) = setup(pool).await;
    for minutes_ago in [30, 10, 20] {
        logs.create(visit(link_id, minutes_ago)).await.unwrap();
    }

    let page = logs.list_for_link(link_id, 1, 2).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].visited_at > page[1].visited_at);
    assert_eq!(logs.count_for_link(link_id).await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_delete_for_link(pool: PgPool) {
    let (_, logs, link_id) = setup(pool).await;
    logs.create(visit(link_id, 2)).await.unwrap();
    logs.create(visit(link_id, 1)).await.unwrap();

    assert_eq!(
        logs.soft_delete_for_link(link_id, Utc::now()).await.unwrap(),
        2
    );
    assert_eq!(logs.count_for_link(link_id).await.unwrap(), 0);
    assert!(logs.list_for_link(link_id, 0, 10).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_skips_deleted_link(pool: PgPool) {
    let (links, logs, link_id) = setup(pool.clone()).await;
    let now = Utc::now();

    logs.soft_delete_for_link(link_id, now).await.unwrap();
    assert!(links.soft_delete(link_id, now).await.unwrap());

    logs.create(visit(link_id, 0)).await.unwrap();

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_logs WHERE link_id = $1")
        .bind(link_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}
