//! Domain error taxonomy
//!
//! Every failure is terminal and detected before any persistence write;
//! services never retry or guess a corrective action.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("There are overlapping appointments between {start} and {end}. Please choose another date.")]
    SchedulingConflict {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl DomainError {
    /// Shorthand for the common lookup-by-id failure.
    pub fn not_found(entity: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
