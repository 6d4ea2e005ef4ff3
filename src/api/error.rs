use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::commands::CommandError;
use crate::ledger::{ErrorKind, LedgerError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not Allowed")]
    NotAllowed,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotAllowed => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotAllowed => "NOT_ALLOWED",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            ErrorKind::InvalidInput => ApiError::InvalidInput(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_mapping() {
        let err: ApiError = LedgerError::TopicNotFound("coffee".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err: ApiError = LedgerError::InvalidTopicName("a b".into()).into();
        assert_eq!(err.code(), "INVALID_INPUT");

        let err: ApiError = LedgerError::PointsOverflow {
            topic: "coffee".into(),
            user: "@ana".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_allowed_message() {
        assert_eq!(ApiError::NotAllowed.to_string(), "Not Allowed");
        assert_eq!(ApiError::NotAllowed.status_code(), StatusCode::BAD_REQUEST);
    }
}
