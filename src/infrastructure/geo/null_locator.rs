//! Geo locator used when lookups are disabled.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::geo::{GeoInfo, GeoLocator};

/// A locator that never knows where anyone is.
pub struct NullGeoLocator;

impl NullGeoLocator {
    pub fn new() -> Self {
        debug!("Using NullGeoLocator (geo lookups disabled)");
        Self
    }
}

impl Default for NullGeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn resolve(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
