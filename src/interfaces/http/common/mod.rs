//! Shared HTTP plumbing: response envelopes, pagination and error mapping

mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DomainError, Page};

/// Standard response envelope.
///
/// On success: `{"success": true, "data": {...}}`;
/// on failure: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// Convert a repository page, mapping each item into its DTO.
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let mapped = page.map(f);
        Self {
            items: mapped.items,
            total: mapped.total,
            page: mapped.page,
            page_size: mapped.page_size,
            total_pages: mapped.total_pages,
        }
    }
}

/// Pagination query parameters shared by all listing endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page. Default: 20
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    20
}

/// Map a domain error onto its HTTP status and error envelope.
///
/// Storage failures are logged server-side and surfaced to the caller as a
/// generic message.
pub fn error_response<T>(err: &DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = status_for(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {}", err);
        return (status, Json(ApiResponse::error("Internal server error")));
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        // Repositories surface storage failures as "Database error: ..."
        // validation messages; those are server faults, not caller faults.
        DomainError::Validation(msg) if msg.starts_with("Database error:") => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) | DomainError::SchedulingConflict { .. } => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(
            status_for(&DomainError::not_found("Appointment", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::Conflict("name taken".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::SchedulingConflict {
                start: Utc::now(),
                end: Utc::now(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::Unauthorized("no".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&DomainError::Forbidden("no".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_failures_map_to_500_without_leaking_details() {
        let err = DomainError::Validation("Database error: connection lost".into());
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);

        let (status, body) = error_response::<()>(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.error.as_deref(), Some("Internal server error"));
    }
}
