//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`geo`] - Geo lookup providers
//! - [`probe`] - Destination reachability probe

pub mod geo;
pub mod persistence;
pub mod probe;
