use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::models::UnknownVariant;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Internal(msg) => {
                error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}

impl From<UnknownVariant> for ApiError {
    fn from(value: UnknownVariant) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

/// Raised while loading the catalog. Fatal at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is missing the '{0}' collection")]
    MissingCollection(&'static str),
    #[error("invalid record in '{collection}' at index {index}: {source}")]
    InvalidRecord {
        collection: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
