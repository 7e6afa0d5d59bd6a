//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Conventions
//!
//! `Ok(None)` means not found, an empty `Vec` is an empty result set, and
//! `Err` is reserved for failures.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link storage
//! - [`ClickLogRepository`] - Click log storage

pub mod click_log_repository;
pub mod link_repository;

pub use click_log_repository::ClickLogRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_log_repository::MockClickLogRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
