/// Error types for Forum Service
///
/// Every failure is rendered as the response envelope with HTTP 200: clients
/// read `message` (and `tokenExpired`) from the body, never the status line.
use crate::models::ApiResponse;
use actix_middleware::TokenRejection;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for forum-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned when the acting user is unknown or banned
pub const NOT_AUTHORIZED_MESSAGE: &str = "You are not authorized to take this action!";

const DATA_LAYER_MESSAGE: &str = "Something went wrong while accessing the forum data";

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Bearer token missing, malformed, badly signed or expired
    #[error("{0}")]
    TokenInvalidOrExpired(String),

    /// Acting user does not exist or is banned
    #[error("You are not authorized to take this action!")]
    UserNotFoundOrBanned,

    /// Authenticated user may not perform this action on this resource
    #[error("{0}")]
    Forbidden(String),

    /// Post or user absent
    #[error("{0}")]
    NotFound(String),

    /// Unparsable path segment or request body
    #[error("{0}")]
    BadRequest(String),

    /// Any storage error
    #[error("Database error: {0}")]
    DataLayerFailure(#[from] sqlx::Error),
}

impl AppError {
    /// Text placed in the envelope's `message` field
    pub fn client_message(&self) -> String {
        match self {
            AppError::DataLayerFailure(_) => DATA_LAYER_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TokenRejection> for AppError {
    fn from(rejection: TokenRejection) -> Self {
        AppError::TokenInvalidOrExpired(rejection.message)
    }
}

/// Renders token guard rejections as the usual envelope
pub fn render_token_rejection(rejection: TokenRejection) -> HttpResponse {
    AppError::from(rejection).error_response()
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        let envelope = match self {
            AppError::DataLayerFailure(source) => {
                tracing::error!(error = %source, "data layer failure");
                ApiResponse::failure(self.client_message())
            }
            AppError::TokenInvalidOrExpired(_) => {
                ApiResponse::failure(self.client_message()).with_token_expired()
            }
            other => {
                tracing::debug!(error = %other, "request rejected");
                ApiResponse::failure(self.client_message())
            }
        };

        HttpResponse::build(self.status_code()).json(envelope)
    }
}
