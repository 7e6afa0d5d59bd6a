//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An in-memory representation of a redirect for async processing.
///
/// Created by the redirect handler once the link is resolved and handed to
/// [`crate::domain::click_worker::ClickRecorder`]. The event carries
/// everything the worker needs, so processing never looks the link up again.
///
/// The log id is assigned here: retried writes of the same event reuse it and
/// the store keeps a single row.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub id: Uuid,
    pub link_id: Uuid,
    pub long_url: String,
    pub client_ip: Option<String>,
    pub visited_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event for a visit happening now.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(link.id, link.long_url.clone(), Some("203.0.113.7".into()));
    /// state.click_recorder.record(event);
    /// ```
    pub fn new(link_id: Uuid, long_url: String, client_ip: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            link_id,
            long_url,
            client_ip,
            visited_at: Utc::now(),
        }
    }
}
