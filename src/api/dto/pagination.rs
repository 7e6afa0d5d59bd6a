//! Pagination query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
const PAGE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 10..=1000;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Validates pagination parameters and fills in defaults.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 10 and 1000
    ///
    /// # Returns
    ///
    /// `(page, page_size)` tuple.
    pub fn validate(&self) -> Result<(u32, u32), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !PAGE_SIZE_RANGE.contains(&page_size) {
            return Err(AppError::bad_request(
                "Page size must be between 10 and 1000",
                json!({ "page_size": page_size }),
            ));
        }

        Ok((page, page_size))
    }
}
