//! Geo lookup implementations.
//!
//! - [`HttpGeoLocator`] - External JSON API with an in-memory cache
//! - [`NullGeoLocator`] - Lookups disabled

mod http_locator;
mod null_locator;

use std::sync::Arc;

use tracing::info;

use crate::domain::geo::GeoLocator;

pub use http_locator::HttpGeoLocator;
pub use null_locator::NullGeoLocator;

/// Picks a locator from the configured URL template. Empty disables lookups.
pub fn from_config(url_template: Option<&str>) -> Arc<dyn GeoLocator> {
    let locator: Arc<dyn GeoLocator> = match url_template {
        Some(template) if !template.trim().is_empty() => Arc::new(HttpGeoLocator::new(template)),
        _ => Arc::new(NullGeoLocator::new()),
    };

    info!(provider = locator.name(), "Geo lookup initialized");
    locator
}
