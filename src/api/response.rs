//! Response types for the commission engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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

    /// Creates an unknown roster error response.
    pub fn unknown_roster(name: &str) -> Self {
        Self::with_details(
            "UNKNOWN_ROSTER",
            format!("Downline roster not found: {}", name),
            format!("The roster '{}' is not configured on this engine", name),
        )
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
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
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::UnknownFrequency { period_date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "UNKNOWN_FREQUENCY",
                    format!("Unknown pay frequency for period {}", period_date),
                    "Supply weekly, bi_weekly, semi_monthly or monthly, or omit it to detect",
                ),
            },
            EngineError::InvalidPacket {
                period_date,
                message,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PACKET",
                    format!("Invalid packet for period {}: {}", period_date, message),
                    "The packet data contains invalid information",
                ),
            },
            EngineError::UnknownRoster { name } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::unknown_roster(&name),
            },
            EngineError::InvalidAgentConfig { agent, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_AGENT_CONFIG",
                    format!("Invalid agent '{}': {}", agent, message),
                    "The agent configuration contains invalid information",
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_unknown_roster_maps_to_not_found() {
        let api_error: ApiErrorResponse = EngineError::UnknownRoster {
            name: "nobody".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "UNKNOWN_ROSTER");
        assert!(api_error.error.message.contains("nobody"));
    }

    #[test]
    fn test_invalid_agent_maps_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidAgentConfig {
            agent: "Greedy".to_string(),
            message: "percent_of_plan must be between 0 and 100".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_AGENT_CONFIG");
    }

    #[test]
    fn test_invalid_packet_maps_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidPacket {
            period_date: NaiveDate::from_ymd_opt(2025, 12, 7).unwrap(),
            message: "blank employee id".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PACKET");
    }
}
