//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::data::AppIdError;

/// Errors returned by route handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed
    #[error("{0}")]
    BadRequest(String),

    /// No route matched
    #[error("not found")]
    NotFound,

    /// Something escaped a handler
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<AppIdError> for ApiError {
    fn from(err: AppIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        } else {
            warn!(error = %self, "Client error occurred");
        }

        // Internal details only leave the process in debug builds
        let message = match &self {
            ApiError::Internal(_) if !cfg!(debug_assertions) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        (self.status_code(), Json(json!({ "error": message }))).into_response()
    }
}
