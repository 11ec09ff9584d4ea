//! Client-facing errors for the todo API.
//!
//! # Design
//! Every variant renders as `{"error": "<message>"}` with a fixed, generic
//! message. Store failures keep their source for logging but the detail is
//! never written to the response body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The path identifier is not a positive integer.
    #[error("invalid id")]
    InvalidId,

    /// The body is not valid JSON for the operation, or fails validation.
    #[error("invalid payload")]
    InvalidPayload,

    #[error("not found")]
    NotFound,

    #[error("db query failed")]
    Query(#[source] StoreError),

    #[error("db create failed")]
    Create(#[source] StoreError),

    #[error("db update failed")]
    Update(#[source] StoreError),

    #[error("db delete failed")]
    Delete(#[source] StoreError),
}

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::InvalidPayload => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Query(_) | ApiError::Create(_) | ApiError::Update(_) | ApiError::Delete(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(%rejection, "rejected request body");
        ApiError::InvalidPayload
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Some(source) = std::error::Error::source(&self) {
            tracing::error!(error = %source, "{self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
