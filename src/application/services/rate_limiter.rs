//! Per-client-IP token bucket admission control.

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use metrics::counter;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AppError;

/// Bucket shape: one token is restored every `period`, up to `burst` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub period: Duration,
    pub burst: u32,
}

impl RateLimitPolicy {
    /// Policy guarding link creation: 1 token per 5 s, burst 5.
    pub const GENERAL: RateLimitPolicy = RateLimitPolicy {
        period: Duration::from_secs(5),
        burst: 5,
    };

    /// Stricter policy for one-time-code issuing: 1 token per 60 s, burst 3.
    pub const OTP: RateLimitPolicy = RateLimitPolicy {
        period: Duration::from_secs(60),
        burst: 3,
    };

    fn quota(&self) -> Option<Quota> {
        let burst = NonZeroU32::new(self.burst)?;
        Quota::with_period(self.period).map(|q| q.allow_burst(burst))
    }
}

/// A named keyed limiter. Cloning shares the underlying buckets.
///
/// Buckets are created on first use of an IP; creation is atomic per key, so
/// concurrent first requests from one IP share a single bucket.
#[derive(Clone)]
pub struct RateLimiter {
    name: &'static str,
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimiter {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the period is zero or the burst is 0.
    pub fn new(name: &'static str, policy: RateLimitPolicy) -> Result<Self, AppError> {
        let quota = policy.quota().ok_or_else(|| {
            AppError::internal(
                "Invalid rate limit policy",
                json!({
                    "limiter": name,
                    "period_ms": policy.period.as_millis() as u64,
                    "burst": policy.burst,
                }),
            )
        })?;

        Ok(Self {
            name,
            limiter: Arc::new(GovernorRateLimiter::keyed(quota)),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Takes one token from `ip`'s bucket if one is available.
    pub fn allow(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }

    /// Like [`Self::allow`], but reports a denial as an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] when the bucket is empty.
    pub fn check(&self, ip: IpAddr) -> Result<(), AppError> {
        if self.allow(ip) {
            return Ok(());
        }

        warn!(limiter = self.name, %ip, "Rate limit exceeded");
        counter!("rate_limited_total", "limiter" => self.name).increment(1);

        Err(AppError::rate_limited(
            "Too many requests",
            json!({ "limiter": self.name }),
        ))
    }

    /// Drops buckets that have fully refilled and returns how many went away.
    ///
    /// A full bucket behaves exactly like a missing one, so eviction never
    /// changes a decision.
    pub fn evict_idle(&self) -> usize {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        before.saturating_sub(self.limiter.len())
    }

    /// Number of tracked buckets.
    pub fn tracked(&self) -> usize {
        self.limiter.len()
    }
}

/// The limiters the HTTP layer applies.
#[derive(Clone)]
pub struct RateLimits {
    pub general: RateLimiter,
    pub otp: RateLimiter,
}

impl RateLimits {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if either policy is invalid.
    pub fn new(general: RateLimitPolicy, otp: RateLimitPolicy) -> Result<Self, AppError> {
        Ok(Self {
            general: RateLimiter::new("general", general)?,
            otp: RateLimiter::new("otp", otp)?,
        })
    }

    pub fn evict_idle(&self) -> usize {
        self.general.evict_idle() + self.otp.evict_idle()
    }
}

/// Periodically evicts idle buckets for as long as the runtime lives.
pub fn spawn_sweeper(limits: RateLimits, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let evicted = limits.evict_idle();
            if evicted > 0 {
                debug!(evicted, "Evicted idle rate limit buckets");
            }
        }
    })
}
