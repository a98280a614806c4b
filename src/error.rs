use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;
use tracing::error;

/// Failure taxonomy for the whole API surface. Every handler returns
/// `Result<_, ApiError>`; the message carried here is the user-visible one,
/// storage internals are logged, never surfaced.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// Missing or invalid request field.
    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] String),

    /// Duplicate email on signup. Surfaced as 400 to match the public API.
    #[display(fmt = "{}", _0)]
    Conflict(#[error(not(source))] String),

    /// Missing, malformed, or expired bearer token.
    #[display(fmt = "{}", _0)]
    Auth(#[error(not(source))] String),

    /// Unknown subject, or a subject owned by another user.
    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),

    /// Persistence failure; carries only the generic public message.
    #[display(fmt = "{}", _0)]
    Storage(#[error(not(source))] String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        ApiError::Auth(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Logs the storage error and swaps it for a generic public message.
    pub fn storage(public_msg: &str, e: sqlx::Error) -> Self {
        error!(error = %e, "{}", public_msg);
        ApiError::Storage(public_msg.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
