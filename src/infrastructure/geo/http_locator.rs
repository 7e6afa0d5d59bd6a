//! Geo lookup through an external JSON HTTP API.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use crate::domain::geo::{GeoInfo, GeoLocator};

/// How long a resolved (or unresolvable) IP stays cached.
const CACHE_TTL_SECS: u64 = 15 * 60;
const CACHE_MAX_CAPACITY: u64 = 10_000;
const HTTP_TIMEOUT_SECS: u64 = 2;

/// Resolves IPs with an HTTP API such as `https://ipinfo.io/{ip}/json`.
///
/// The URL template must contain an `{ip}` placeholder. Responses are read
/// as JSON objects; `country`/`countryCode`/`country_code` and `city` are
/// recognised, and `{"status": "fail"}` or `{"bogon": true}` mean unknown.
///
/// Results, including misses, are cached with a TTL. Concurrent lookups of
/// the same IP share one request.
pub struct HttpGeoLocator {
    url_template: String,
    agent: Agent,
    cache: Cache<String, Option<GeoInfo>>,
}

impl HttpGeoLocator {
    pub fn new(url_template: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .max_capacity(CACHE_MAX_CAPACITY)
            .build();

        Self {
            url_template: url_template.to_string(),
            agent,
            cache,
        }
    }

    fn fetch_sync(agent: &Agent, url: &str) -> Option<GeoInfo> {
        let response = match agent.get(url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!(%url, error = %e, "Geo lookup request failed");
                return None;
            }
        };

        let json: Value = match response.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!(%url, error = %e, "Geo lookup response is not valid JSON");
                return None;
            }
        };

        parse_geo_response(&json)
    }

    async fn fetch(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.url_template.replace("{ip}", ip);
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || Self::fetch_sync(&agent, &url))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Geo lookup task failed");
                None
            })
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn resolve(&self, ip: &str) -> Option<GeoInfo> {
        if !is_routable(ip) {
            trace!(%ip, "Skipping geo lookup for non-routable address");
            return None;
        }

        self.cache
            .get_with(ip.to_string(), async {
                trace!(%ip, "Geo cache miss");
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Extracts location fields from a lookup response.
fn parse_geo_response(json: &Value) -> Option<GeoInfo> {
    if json["status"].as_str() == Some("fail") || json["bogon"].as_bool() == Some(true) {
        return None;
    }

    let non_empty = |v: &Value| v.as_str().filter(|s| !s.is_empty()).map(String::from);

    let country = non_empty(&json["countryCode"])
        .or_else(|| non_empty(&json["country_code"]))
        .or_else(|| non_empty(&json["country"]));
    let city = non_empty(&json["city"]);

    let info = GeoInfo { country, city };
    (!info.is_empty()).then_some(info)
}

/// Public addresses only; private, loopback and malformed inputs are skipped.
fn is_routable(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast())
        }
        Ok(IpAddr::V6(v6)) => !(v6.is_loopback() || v6.is_unspecified()),
        Err(_) => false,
    }
}
