//! Click log entity representing a single redirect visit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Lifecycle;

/// Location resolved for a client IP. Either part may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl GeoInfo {
    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.city.is_none()
    }
}

/// Result of probing the destination URL when the click was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub http_status_code: i32,
    pub redirect_status: String,
}

/// A persisted redirect event.
#[derive(Debug, Clone)]
pub struct ClickLog {
    pub id: Uuid,
    pub link_id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub geo: Option<GeoInfo>,
    pub outcome: Option<ProbeOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

/// Input for recording a click. Inserts are idempotent on `id`.
#[derive(Debug, Clone)]
pub struct NewClickLog {
    pub id: Uuid,
    pub link_id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub geo: Option<GeoInfo>,
    pub outcome: Option<ProbeOutcome>,
}
