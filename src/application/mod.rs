//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the API used by HTTP
//! handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link registry
//! - [`services::click_log_service::ClickLogService`] - Click log listings
//! - [`services::auth_service::AuthService`] - Bearer JWT verification
//! - [`services::rate_limiter::RateLimits`] - Per-IP admission control

pub mod services;
