//! Target reachability probe recorded alongside click logs.

use async_trait::async_trait;

pub use crate::domain::entities::ProbeOutcome;

/// Checks whether a link's destination answers.
///
/// Failures are reported inside the outcome (status 500 and the error text),
/// so a probe never fails the click it belongs to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetProbe: Send + Sync {
    async fn probe(&self, url: &str) -> ProbeOutcome;
}
