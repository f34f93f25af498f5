//! Response types for the scheduling API.
//!
//! This module defines the success payloads, the error response
//! structures, and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{Shift, ShiftCandidate};

/// Response body for schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    /// Every generated candidate, whether or not it was newly persisted.
    pub schedule: Vec<ShiftCandidate>,
    /// Newly inserted record count; zero on a fully idempotent repeat.
    pub persisted_count: u64,
    /// True when persistence ran without transactional guarantees.
    pub fallback: bool,
}

/// Response body when a single create hit an existing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingShiftResponse {
    /// Always true; the operation is a successful no-op.
    pub ok: bool,
    /// Always true; distinguishes the no-op from a fresh insert.
    pub existed: bool,
    /// The record already occupying the slot.
    pub shift: Shift,
}

/// Response body for an individual shift deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteShiftResponse {
    /// Always true on success.
    pub ok: bool,
}

/// Response body for an agent deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAgentResponse {
    /// Dependent shifts removed by the cascade.
    pub deleted_shift_count: u64,
}

/// Response body for a standalone orphan sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanSweepResponse {
    /// Orphaned shifts removed.
    pub removed: u64,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::InvalidTime { .. }
            | EngineError::InvalidDate { .. }
            | EngineError::MissingField { .. }
            | EngineError::InvalidShiftLength { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(error.to_string()),
            },
            EngineError::NotFound { ref entity, ref id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    error.to_string(),
                    format!("No {} with id '{}' is visible to this caller", entity, id),
                ),
            },
            EngineError::Conflict { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("CONFLICT", error.to_string()),
            },
            EngineError::TransactionUnsupported => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new("TRANSACTION_UNSUPPORTED", error.to_string()),
            },
        }
    }
}

/// Maps a request-body rejection to an error payload.
///
/// Missing fields surface as validation errors; everything else is
/// malformed JSON.
pub(crate) fn rejection_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let err = EngineError::InvalidTime {
            value: "25:99".to_string(),
        };
        let response: ApiErrorResponse = err.into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = EngineError::not_found("Shift", "abc");
        let response: ApiErrorResponse = err.into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "NOT_FOUND");
        assert!(response.error.details.is_some());
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = EngineError::Conflict {
            message: "slot taken".to_string(),
        };
        let response: ApiErrorResponse = err.into();
        assert_eq!(response.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_generate_response_shape() {
        let response = GenerateScheduleResponse {
            schedule: vec![],
            persisted_count: 0,
            fallback: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("persistedCount").is_some());
        assert!(json.get("schedule").is_some());
        assert!(json.get("fallback").is_some());
    }

    #[test]
    fn test_delete_agent_response_shape() {
        let response = DeleteAgentResponse {
            deleted_shift_count: 3,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["deletedShiftCount"], 3);
    }
}
