// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ifc_view_model::{ModelError, QueryError};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("No model loaded")]
    NoModel,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::Model(ModelError::InvalidUtf8(_)) => (StatusCode::BAD_REQUEST, "INVALID_UTF8"),
            ApiError::Model(ModelError::Io { .. }) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            ApiError::Model(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_MODEL"),
            ApiError::Query(QueryError::InvalidPattern { .. }) => (StatusCode::BAD_REQUEST, "INVALID_PATTERN"),
            ApiError::Query(QueryError::Worker(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "QUERY_ERROR"),
            ApiError::NoModel => (StatusCode::NOT_FOUND, "NO_MODEL_LOADED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
