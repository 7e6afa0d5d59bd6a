//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the click pipeline,
//! independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`geo`] / [`probe`] - Click enrichment seams
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Bounded queue and worker pool for click logs
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the link and answers immediately
//! 2. A [`click_event::ClickEvent`] is offered to the bounded queue
//! 3. [`click_worker::run_click_worker`] picks it up on a worker task
//! 4. The event is enriched and persisted via [`repositories::ClickLogRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod geo;
pub mod probe;
pub mod repositories;
