//! Error types for Carbonico.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while interpreting activity input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// The video quality is not one of `sd`, `hd` or `4k`.
    #[error("invalid video quality '{0}', expected one of: sd, hd, 4k")]
    InvalidVideoQuality(String),
}

/// Errors returned by HTTP handlers.
///
/// Storage failures are reported to the client without their underlying
/// cause; the cause is logged where the error is raised.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid username: {0}")]
    InvalidUsername(&'static str),

    #[error("activities produce a footprint that is not a finite number")]
    NonFiniteFootprint,

    #[error("{0}")]
    Storage(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUsername(_) | ApiError::NonFiniteFootprint => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_quality_message_names_value() {
        let err = EstimateError::InvalidVideoQuality("8k".to_string());
        assert!(err.to_string().contains("'8k'"));
    }

    #[test]
    fn test_api_error_status() {
        assert_eq!(
            ApiError::InvalidUsername("empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NonFiniteFootprint.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage("Failed to save calculation").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
