//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod health;
pub mod links;
pub mod logs;
pub mod redirect;

pub use admin::user_links_handler;
pub use health::health_handler;
pub use links::{create_link_handler, delete_link_handler, get_link_handler, list_links_handler};
pub use logs::link_logs_handler;
pub use redirect::redirect_handler;
