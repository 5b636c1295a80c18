use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use validator::ValidationError;

#[derive(Debug)]
pub enum Error {
    SessionNotFound,
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionNotFound => write!(f, "Session not found or expired"),
            Self::InvalidInput(code) => write!(f, "Invalid input: {}", code),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::InvalidInput(err.code.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::SessionNotFound => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };
        tracing::warn!("Request rejected: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
