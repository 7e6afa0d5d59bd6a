//! DTOs for click log listings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{ClickLog, GeoInfo};

/// Paginated click logs of one link.
#[derive(Debug, Serialize)]
pub struct ClickLogListResponse {
    pub pagination: PaginationMeta,
    pub items: Vec<ClickLogItem>,
}

/// A single recorded visit.
#[derive(Debug, Serialize)]
pub struct ClickLogItem {
    pub id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub geo: Option<GeoInfo>,
    pub http_status_code: Option<i32>,
    pub redirect_status: Option<String>,
}

impl From<ClickLog> for ClickLogItem {
    fn from(log: ClickLog) -> Self {
        let (http_status_code, redirect_status) = match log.outcome {
            Some(outcome) => (Some(outcome.http_status_code), Some(outcome.redirect_status)),
            None => (None, None),
        };

        Self {
            id: log.id,
            visited_at: log.visited_at,
            client_ip: log.client_ip,
            geo: log.geo,
            http_status_code,
            redirect_status,
        }
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            (total_items.max(0) as u64).div_ceil(u64::from(page_size)) as u32
        };

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
