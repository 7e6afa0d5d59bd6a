//! Geo lookup seam used to enrich click logs.

use async_trait::async_trait;

pub use crate::domain::entities::GeoInfo;

/// Resolves a client IP to a coarse location.
///
/// Lookups are best-effort: any failure yields `None`, never an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::geo::HttpGeoLocator`] - JSON HTTP API with a cache
/// - [`crate::infrastructure::geo::NullGeoLocator`] - Disabled lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn resolve(&self, ip: &str) -> Option<GeoInfo>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
