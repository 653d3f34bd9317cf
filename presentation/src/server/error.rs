//! HTTP error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_application::RelayError;
use serde::Serialize;
use thiserror::Error;

/// `error` field of every chat failure.
pub const CHAT_FAILED: &str = "Failed to process chat request";

/// Errors returned by the relay endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// Anything that goes wrong before the first frame is written.
    #[error("{0}")]
    ChatFailed(String),

    #[error("Missing or invalid bearer token")]
    Unauthorized,
}

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub details: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ChatFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(error: RelayError) -> Self {
        ApiError::ChatFailed(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::ChatFailed(format!("Invalid request body: {}", error))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::ChatFailed(_) => CHAT_FAILED,
            ApiError::Unauthorized => "Unauthorized",
        };
        let body = ErrorBody {
            error,
            details: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
