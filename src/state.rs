//! Shared application state passed to every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, ClickLogService, LinkService, RateLimits};
use crate::domain::click_worker::ClickRecorder;
use crate::domain::repositories::{ClickLogRepository, LinkRepository};

/// Services and handles shared by all requests.
///
/// Cloning is cheap: every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub click_log_service: Arc<ClickLogService>,
    pub auth_service: Arc<AuthService>,
    pub rate_limits: RateLimits,
    pub click_recorder: ClickRecorder,
    /// Trust proxy headers when resolving client IPs.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services on top of the given repositories.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        click_logs: Arc<dyn ClickLogRepository>,
        auth_service: AuthService,
        rate_limits: RateLimits,
        click_recorder: ClickRecorder,
        code_max_attempts: usize,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(
                links,
                Arc::clone(&click_logs),
                code_max_attempts,
            )),
            click_log_service: Arc::new(ClickLogService::new(click_logs)),
            auth_service: Arc::new(auth_service),
            rate_limits,
            click_recorder,
            behind_proxy,
        }
    }
}
