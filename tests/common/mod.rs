#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower::Layer;
use uuid::Uuid;

use shortlink_tracker::application::services::{AuthService, RateLimitPolicy, RateLimits};
use shortlink_tracker::domain::click_event::ClickEvent;
use shortlink_tracker::domain::click_worker::ClickRecorder;
use shortlink_tracker::domain::entities::{
    ClickLog, Lifecycle, LinkStatus, NewClickLog, NewShortLink, Principal, Role, ShortLink,
};
use shortlink_tracker::domain::repositories::{ClickLogRepository, LinkRepository};
use shortlink_tracker::error::AppError;
use shortlink_tracker::routes::router;
use shortlink_tracker::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";
pub const PEER_ADDR: &str = "127.0.0.1:12345";

/// Link store backed by a vector, with the live-code uniqueness of the
/// PostgreSQL partial index.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<ShortLink>>,
    forced_conflicts: AtomicUsize,
    offline: AtomicBool,
}

impl InMemoryLinkRepository {
    /// Makes the next `n` inserts fail with a code conflict.
    pub fn force_conflicts(&self, n: usize) {
        self.forced_conflicts.store(n, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn insert(&self, owner_id: Uuid, long_url: &str, short_code: &str) -> ShortLink {
        let now = Utc::now();
        let link = ShortLink {
            id: Uuid::now_v7(),
            owner_id,
            long_url: long_url.to_string(),
            short_code: short_code.to_string(),
            status: LinkStatus::Active,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };
        self.links.lock().unwrap().push(link.clone());
        link
    }

    pub fn set_status(&self, short_code: &str, status: LinkStatus) {
        for link in self.links.lock().unwrap().iter_mut() {
            if link.short_code == short_code {
                link.status = status;
            }
        }
    }

    pub fn all(&self) -> Vec<ShortLink> {
        self.links.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        self.check_online()?;

        let conflict = self
            .forced_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let mut links = self.links.lock().unwrap();
        if conflict
            || links
                .iter()
                .any(|l| !l.lifecycle.is_deleted() && l.short_code == new_link.short_code)
        {
            return Err(AppError::conflict("Unique constraint violation", json!({})));
        }

        let now = Utc::now();
        let link = ShortLink {
            id: new_link.id,
            owner_id: new_link.owner_id,
            long_url: new_link.long_url,
            short_code: new_link.short_code,
            status: new_link.status,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.check_online()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| !l.lifecycle.is_deleted() && l.short_code == code)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        self.check_online()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| !l.lifecycle.is_deleted() && l.id == id)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        self.check_online()?;
        let mut links: Vec<ShortLink> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| !l.lifecycle.is_deleted() && l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn soft_delete(&self, id: Uuid, as_of: DateTime<Utc>) -> Result<bool, AppError> {
        self.check_online()?;
        let mut links = self.links.lock().unwrap();
        match links
            .iter_mut()
            .find(|l| !l.lifecycle.is_deleted() && l.id == id)
        {
            Some(link) => {
                link.lifecycle = Lifecycle::Deleted { at: as_of };
                link.updated_at = as_of;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}

/// Click log store backed by a vector. Writes can be made to fail.
#[derive(Default)]
pub struct InMemoryClickLogRepository {
    logs: Mutex<Vec<ClickLog>>,
    failing: AtomicBool,
    attempts: AtomicUsize,
}

impl InMemoryClickLogRepository {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `create` calls, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<ClickLog> {
        self.logs.lock().unwrap().clone()
    }

    pub fn insert_visit(&self, link_id: Uuid, visited_at: DateTime<Utc>, client_ip: &str) {
        self.logs.lock().unwrap().push(ClickLog {
            id: Uuid::now_v7(),
            link_id,
            visited_at,
            client_ip: Some(client_ip.to_string()),
            geo: None,
            outcome: None,
            created_at: visited_at,
            updated_at: visited_at,
            lifecycle: Lifecycle::Active,
        });
    }
}

#[async_trait]
impl ClickLogRepository for InMemoryClickLogRepository {
    async fn create(&self, new_log: NewClickLog) -> Result<(), AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }

        let mut logs = self.logs.lock().unwrap();
        if logs.iter().any(|l| l.id == new_log.id) {
            return Ok(());
        }

        let now = Utc::now();
        logs.push(ClickLog {
            id: new_log.id,
            link_id: new_log.link_id,
            visited_at: new_log.visited_at,
            client_ip: new_log.client_ip,
            geo: new_log.geo,
            outcome: new_log.outcome,
            created_at: now,
            updated_at: now,
            lifecycle: Lifecycle::Active,
        });
        Ok(())
    }

    async fn soft_delete_for_link(
        &self,
        link_id: Uuid,
        as_of: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }

        let mut deleted = 0;
        for log in self.logs.lock().unwrap().iter_mut() {
            if log.link_id == link_id && !log.lifecycle.is_deleted() {
                log.lifecycle = Lifecycle::Deleted { at: as_of };
                log.updated_at = as_of;
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn count_for_link(&self, link_id: Uuid) -> Result<i64, AppError> {
        Ok(self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.link_id == link_id && !l.lifecycle.is_deleted())
            .count() as i64)
    }

    async fn list_for_link(
        &self,
        link_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ClickLog>, AppError> {
        let mut logs: Vec<ClickLog> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.link_id == link_id && !l.lifecycle.is_deleted())
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));
        Ok(logs
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

/// Everything a handler test needs: state, the stores behind it and the
/// receiving end of the click queue.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub click_logs: Arc<InMemoryClickLogRepository>,
    pub clicks: mpsc::Receiver<ClickEvent>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_limits(RateLimitPolicy::GENERAL, RateLimitPolicy::OTP)
    }

    pub fn with_limits(general: RateLimitPolicy, otp: RateLimitPolicy) -> Self {
        Self::build(general, otp, 100, false)
    }

    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self::build(RateLimitPolicy::GENERAL, RateLimitPolicy::OTP, capacity, false)
    }

    /// Client IPs are taken from `X-Forwarded-For` / `X-Real-IP`.
    pub fn behind_proxy() -> Self {
        Self::build(RateLimitPolicy::GENERAL, RateLimitPolicy::OTP, 100, true)
    }

    fn build(
        general: RateLimitPolicy,
        otp: RateLimitPolicy,
        capacity: usize,
        behind_proxy: bool,
    ) -> Self {
        let links = Arc::new(InMemoryLinkRepository::default());
        let click_logs = Arc::new(InMemoryClickLogRepository::default());
        let (recorder, clicks) = ClickRecorder::channel(capacity);

        let state = AppState::new(
            links.clone(),
            click_logs.clone(),
            AuthService::new(TEST_SECRET),
            RateLimits::new(general, otp).unwrap(),
            recorder,
            5,
            behind_proxy,
        );

        Self {
            state,
            links,
            click_logs,
            clicks,
        }
    }

    /// Full application router with a fixed peer address.
    pub fn server(&self) -> TestServer {
        let app = router(self.state.clone()).layer(MockConnectInfoLayer);
        TestServer::new(app).unwrap()
    }

    pub fn token_for(&self, principal: Principal) -> String {
        self.state
            .auth_service
            .issue(principal.user_id, principal.role, chrono::Duration::hours(1))
            .unwrap()
    }

    pub fn user_token(&self, user_id: Uuid) -> String {
        self.token_for(Principal {
            user_id,
            role: Role::User,
        })
    }

    pub fn admin_token(&self) -> String {
        self.token_for(Principal::admin(Uuid::now_v7()))
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
