//! HTTP mapping of `RedatorError`

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::RedatorError;

impl RedatorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RedatorError::Unauthorized => StatusCode::UNAUTHORIZED,
            RedatorError::NotFound(_) => StatusCode::NOT_FOUND,
            RedatorError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RedatorError::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RedatorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => log::error!("Request failed: {}", self),
            StatusCode::BAD_GATEWAY => log::warn!("Request failed: {}", self),
            _ => log::debug!("Request rejected: {}", self),
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
