//! Error handling for the web server
//!
//! Handlers return `ApiResult<T>`; an `ApiError` becomes a plain-text
//! response with the matching status code. Internal errors are logged and
//! answered with a generic message so no detail reaches the client.
//!
//! # Example
//!
//! ```
//! use daybook_api::error::{ApiError, ApiResult};
//!
//! fn parse_id(raw: &str) -> ApiResult<i64> {
//!     raw.parse()
//!         .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
//! }
//!
//! assert!(parse_id("42").is_ok());
//! assert!(parse_id("abc").is_err());
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use daybook_shared::auth::password::PasswordError;
use std::fmt;

use crate::views::RenderError;

/// Body sent for every 500 response
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified handler error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500); the detail is only logged
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, message).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Not found".to_string()),
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Internal(format!("Rendering failed: {}", err))
    }
}

/// Convert form validation errors to a 400 carrying the first message
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());

        ApiError::BadRequest(message)
    }
}
