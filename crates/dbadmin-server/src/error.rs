//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dbadmin_biscuit::BiscuitError;
use dbadmin_core::AdminError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by handlers. Every variant renders as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or a statement the database rejected.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (e.g. registration is closed).
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidArgument(msg) | AdminError::Query(msg) => ApiError::BadRequest(msg),
            AdminError::NotFound(msg) => ApiError::NotFound(msg),
            AdminError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            AdminError::Conflict(msg) => ApiError::Conflict(msg),
            AdminError::Unavailable(msg) | AdminError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<BiscuitError> for ApiError {
    fn from(err: BiscuitError) -> Self {
        tracing::debug!(error = %err, "token rejected");
        let message = match err {
            BiscuitError::Expired => "token has expired",
            _ => "invalid token",
        };
        ApiError::Unauthorized(message.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("unable to parse body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("unable to parse query: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
