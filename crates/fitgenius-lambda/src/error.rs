use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use fitgenius_auth::error::AuthError;
use fitgenius_bedrock::error::BedrockError;
use fitgenius_core::error::CoreError;
use fitgenius_core::models::profile::FieldIssue;
use fitgenius_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    /// Profile form failed validation.
    InvalidProfile(Vec<FieldIssue>),
    BadGateway(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<FieldIssue>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, issues) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized(msg) => {
                tracing::debug!("unauthorized: {msg}");
                (StatusCode::UNAUTHORIZED, "unauthorized".to_string(), None)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::InvalidProfile(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "profile incomplete".to_string(),
                Some(issues),
            ),
            ApiError::BadGateway(msg) => {
                tracing::error!("upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "upstream service failed".to_string(), None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string(), None)
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                issues,
            }),
        )
            .into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::ProfileIncomplete(issues) => ApiError::InvalidProfile(issues),
            CoreError::UnknownPlanType(t) => ApiError::NotFound(format!("unknown plan type: {t}")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BedrockError> for ApiError {
    fn from(e: BedrockError) -> Self {
        if e.is_validation() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::BadGateway(e.to_string())
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::SignUpFailed(msg) => ApiError::BadRequest(msg),
            AuthError::Jwks(msg) | AuthError::Cognito(msg) => ApiError::BadGateway(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
