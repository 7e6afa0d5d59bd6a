//! Short link entity: the mapping from a short code to a long URL.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Lifecycle;

/// Administrative status of a link. Suspended links do not redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    #[default]
    Active,
    Suspended,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Suspended => "suspended",
        }
    }

    /// Parses the stored representation. Unknown values are treated as suspended.
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => LinkStatus::Active,
            _ => LinkStatus::Suspended,
        }
    }
}

/// A shortened URL owned by a user.
///
/// `short_code` never changes after creation.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub long_url: String,
    pub short_code: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lifecycle: Lifecycle,
}

impl ShortLink {
    /// True when the link is live and allowed to redirect.
    pub fn is_redirectable(&self) -> bool {
        !self.lifecycle.is_deleted() && self.status == LinkStatus::Active
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Input for inserting a new link.
///
/// The id is assigned by the caller (UUIDv7) so a retried insert with a
/// fresh short code keeps the same identity.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub long_url: String,
    pub short_code: String,
    pub status: LinkStatus,
}
