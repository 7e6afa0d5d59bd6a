//! Soft-delete state shared by persisted entities.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether a row is visible to reads or has been soft-deleted.
///
/// Storage keeps this as a nullable `deleted_at` column; conversion happens
/// only in the persistence layer via [`Lifecycle::from_deleted_at`] and
/// [`Lifecycle::deleted_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Lifecycle::Deleted { at },
            None => Lifecycle::Active,
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Lifecycle::Active => None,
            Lifecycle::Deleted { at } => Some(*at),
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Lifecycle::Deleted { .. })
    }
}
