use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;
use tracing::error;

/// Failure taxonomy for every core operation. Each variant maps to a stable
/// machine-readable category and an HTTP status; storage internals are logged
/// but never leaked to the client.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    Validation(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    InvalidState(String),
    #[display(fmt = "{}", _0)]
    InsufficientBalance(String),
    #[display(fmt = "{}", _0)]
    Permission(String),
    #[display(fmt = "storage failure")]
    Storage(sqlx::Error),
}

impl ApiError {
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::InsufficientBalance(_) => "insufficient_balance",
            ApiError::Permission(_) => "permission_denied",
            ApiError::Storage(_) => "storage_error",
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InsufficientBalance(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidState(_) => StatusCode::CONFLICT,
            ApiError::Permission(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Storage(e) = self {
            error!(error = %e, "storage failure");
        }
        let message = match self {
            ApiError::Storage(_) => "Something went wrong, contact the system admin".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.category(),
            "message": message,
        }))
    }
}
