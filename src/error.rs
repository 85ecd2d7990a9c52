//! Service error types with HTTP status code mapping.
//!
//! [`MonitorError`] is the central error type for the service. Each
//! variant maps to a specific HTTP status code and structured JSON
//! error response. Arithmetic edge cases in the accumulation path
//! (negative elapsed time, zero denominators) are clamped internally
//! and never surface through this type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AssetId, ShiftId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2004,
///     "message": "no shift is currently active",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request            |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Asset with the given ID was not found.
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    /// No asset is mapped to the reported logger/channel pair.
    #[error("no asset mapped to logger {logger_id} channel {channel}")]
    LoggerChannelNotFound {
        /// Logger device identifier from the report.
        logger_id: String,
        /// Input channel from the report.
        channel: u16,
    },

    /// Shift with the given ID was not found.
    #[error("shift not found: {0}")]
    ShiftNotFound(ShiftId),

    /// `end_shift` was called with no active shift.
    #[error("no shift is currently active")]
    NoActiveShift,

    /// `start_shift` was called while another shift is active.
    #[error("shift already active: {name} ({shift_id})")]
    ShiftAlreadyActive {
        /// ID of the shift that is already active.
        shift_id: ShiftId,
        /// Name of the shift that is already active.
        name: String,
    },

    /// `start_shift` was called with zero assets configured.
    #[error("no assets configured")]
    NoAssetsConfigured,

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Archive/persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NoAssetsConfigured => 1002,
            Self::AssetNotFound(_) => 2001,
            Self::LoggerChannelNotFound { .. } => 2002,
            Self::ShiftNotFound(_) => 2003,
            Self::NoActiveShift => 2004,
            Self::ShiftAlreadyActive { .. } => 2005,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::NoAssetsConfigured => StatusCode::BAD_REQUEST,
            Self::AssetNotFound(_)
            | Self::LoggerChannelNotFound { .. }
            | Self::ShiftNotFound(_)
            | Self::NoActiveShift => StatusCode::NOT_FOUND,
            Self::ShiftAlreadyActive { .. } => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let err = MonitorError::ShiftAlreadyActive {
            shift_id: ShiftId::new(),
            name: "Day shift".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2005);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let err = MonitorError::LoggerChannelNotFound {
            logger_id: "logger-1".to_string(),
            channel: 3,
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(MonitorError::NoActiveShift.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            MonitorError::NoAssetsConfigured.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflict_message_names_active_shift() {
        let err = MonitorError::ShiftAlreadyActive {
            shift_id: ShiftId::new(),
            name: "Day shift".to_string(),
        };
        assert!(err.to_string().contains("Day shift"));
    }
}
