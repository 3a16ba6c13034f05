//! Common HTTP building blocks

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response envelope.
///
/// Every REST endpoint wraps its payload:
/// on success `{"success": true, "data": {...}}`,
/// on failure `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
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

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Map a domain error to the HTTP status carrying it.
pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::SlotUnavailable(_)
        | DomainError::SlotOccupied(_)
        | DomainError::SpaceClosed(_)
        | DomainError::AlreadyTerminal { .. } => StatusCode::CONFLICT,
        DomainError::InvalidVehicle { .. } | DomainError::InvalidTimeRange => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Shorthand for the error half of a handler result.
pub fn domain_error<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    (status_for(&err), Json(ApiResponse::error(err.to_string())))
}

/// 400 with a plain message, for unparseable request fields.
pub fn bad_request<T>(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

// ── Tests ──────────────────────────────────────────────────────
