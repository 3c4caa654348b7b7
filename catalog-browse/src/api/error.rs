//! API errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Errors returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request parameter
    InvalidInput(String),
    DatabaseError(String),
}

impl From<catalog_common::Error> for ApiError {
    fn from(err: catalog_common::Error) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
