//! Utility functions for short codes, URL handling, and request metadata.
//!
//! # Modules
//!
//! - [`code_generator`] - Base62 short code generation and shape checks
//! - [`url_normalizer`] - Long URL normalization and validation
//! - [`client_ip`] - Client IP resolution behind optional reverse proxies

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
