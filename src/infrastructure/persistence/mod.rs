//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Rows are
//! mapped through private `*Row` structs; the nullable `deleted_at` column is
//! converted to [`crate::domain::entities::Lifecycle`] here and nowhere else.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short link storage and lookup
//! - [`PgClickLogRepository`] - Click log writes and listings

pub mod pg_click_log_repository;
pub mod pg_link_repository;

pub use pg_click_log_repository::PgClickLogRepository;
pub use pg_link_repository::PgLinkRepository;
