//! HTTP GET probe of a link's destination.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use ureq::Agent;

use crate::domain::probe::{ProbeOutcome, TargetProbe};

const PROBE_TIMEOUT_SECS: u64 = 5;

/// Status recorded when the destination could not be reached at all.
const UNREACHABLE_STATUS: i32 = 500;

/// Issues a GET to the destination and records the final status.
///
/// Redirects are followed. Error statuses are recorded, not treated as
/// failures; transport errors become status 500 with the error text.
pub struct HttpTargetProbe {
    agent: Agent,
}

impl HttpTargetProbe {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(PROBE_TIMEOUT_SECS)))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }

    fn probe_sync(agent: &Agent, url: &str) -> ProbeOutcome {
        match agent.get(url).call() {
            Ok(response) => {
                let status = response.status();
                ProbeOutcome {
                    http_status_code: i32::from(status.as_u16()),
                    redirect_status: format_status(status.as_u16(), status.canonical_reason()),
                }
            }
            Err(e) => ProbeOutcome {
                http_status_code: UNREACHABLE_STATUS,
                redirect_status: e.to_string(),
            },
        }
    }
}

impl Default for HttpTargetProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TargetProbe for HttpTargetProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        let agent = self.agent.clone();
        let target = url.to_string();

        let outcome = tokio::task::spawn_blocking(move || Self::probe_sync(&agent, &target))
            .await
            .unwrap_or_else(|e| ProbeOutcome {
                http_status_code: UNREACHABLE_STATUS,
                redirect_status: e.to_string(),
            });

        debug!(%url, status = outcome.http_status_code, "Probed link destination");
        outcome
    }
}

fn format_status(code: u16, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{code} {reason}"),
        None => code.to_string(),
    }
}
