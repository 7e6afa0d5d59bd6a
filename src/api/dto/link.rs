//! DTOs for short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{LinkStatus, ShortLink};

/// Request to shorten a URL.
///
/// The scheme may be omitted; `https://` is assumed.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,
}

/// A link as returned to its owner.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub short_code: String,
    pub long_url: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortLink> for LinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            long_url: link.long_url,
            status: link.status,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Link details plus the number of recorded visits.
#[derive(Debug, Serialize)]
pub struct LinkDetailResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub interactions: i64,
}

/// All live links of one owner, newest first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

impl From<Vec<ShortLink>> for LinkListResponse {
    fn from(links: Vec<ShortLink>) -> Self {
        let items: Vec<LinkResponse> = links.into_iter().map(LinkResponse::from).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}
