//! Read side of click logs.

use std::sync::Arc;

use crate::domain::entities::{ClickLog, ShortLink};
use crate::domain::repositories::ClickLogRepository;
use crate::error::AppError;

/// One page of click logs plus the total across all pages.
#[derive(Debug, Clone)]
pub struct ClickLogPage {
    pub items: Vec<ClickLog>,
    pub total: i64,
}

/// Lists click logs of links the caller was already authorized for.
pub struct ClickLogService {
    click_logs: Arc<dyn ClickLogRepository>,
}

impl ClickLogService {
    pub fn new(click_logs: Arc<dyn ClickLogRepository>) -> Self {
        Self { click_logs }
    }

    /// Returns page `page` (1-indexed) of `link`'s logs, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_for_link(
        &self,
        link: &ShortLink,
        page: i64,
        page_size: i64,
    ) -> Result<ClickLogPage, AppError> {
        let offset = (page.max(1) - 1) * page_size;

        let items = self
            .click_logs
            .list_for_link(link.id, offset, page_size)
            .await?;
        let total = self.click_logs.count_for_link(link.id).await?;

        Ok(ClickLogPage { items, total })
    }
}
