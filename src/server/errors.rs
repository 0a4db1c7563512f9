use crate::RequestError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Reasons a `POST /scan` body is rejected before any network activity
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request body must contain JSON data.")]
    EmptyBody,

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("Payload must be a JSON object.")]
    NotAnObject,

    #[error("'urls' must contain only strings.")]
    NonStringUrl,

    #[error("'concurrency' must be a positive integer when provided.")]
    InvalidConcurrency,

    #[error("'user_agent' must be a string when provided.")]
    InvalidUserAgent,

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!("Rejected scan request: {}", message);

        let body = Json(json!({ "error": message }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
