//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A short code mapped to a long URL, owned by a user
//! - [`ClickLog`] - One recorded visit of a short link
//! - [`Principal`] - The authenticated caller
//!
//! Creation inputs use separate structs (`NewShortLink`, `NewClickLog`).
//! Soft deletion is modelled by [`Lifecycle`].

pub mod click_log;
pub mod lifecycle;
pub mod principal;
pub mod short_link;

pub use click_log::{ClickLog, GeoInfo, NewClickLog, ProbeOutcome};
pub use lifecycle::Lifecycle;
pub use principal::{Principal, Role};
pub use short_link::{LinkStatus, NewShortLink, ShortLink};
