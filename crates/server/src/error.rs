//! Errors surfaced to HTTP clients.
//!
//! Every variant is an expected outcome of a bad or stale request, not a
//! server fault. Each maps to a status code and an `{"error": ...}` body.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::ValidationError;
use serde_json::json;
use thiserror::Error;

/// Message returned for every lookup of an absent id
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body failed the movie schema
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced id is not in the store
    #[error("Movie not found")]
    NotFound,

    /// Body could not be read as JSON at all
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    /// Query string did not fit `ListParams`, e.g. a repeated `genre`
    #[error("Malformed query string: {0}")]
    MalformedQuery(#[from] QueryRejection),

    /// Path segment could not be extracted, e.g. invalid percent-encoding
    #[error("Malformed path: {0}")]
    MalformedPath(#[from] PathRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(rejection) => rejection.status(),
            ApiError::MalformedQuery(rejection) => rejection.status(),
            ApiError::MalformedPath(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(err) => json!({ "error": err }),
            ApiError::NotFound => json!({ "error": NOT_FOUND_MESSAGE }),
            ApiError::MalformedBody(rejection) => json!({ "error": rejection.body_text() }),
            ApiError::MalformedQuery(rejection) => json!({ "error": rejection.body_text() }),
            ApiError::MalformedPath(rejection) => json!({ "error": rejection.body_text() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for handler results
pub type ApiResult<T> = std::result::Result<T, ApiError>;
