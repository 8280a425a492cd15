//! Mapping of game errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde_json::json;
use tracing::error;

use crate::service::GameError;

/// Error returned by request handlers.
#[derive(Debug, Display, Error, From)]
pub struct ApiError(GameError);

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GameError::NotFound => StatusCode::NOT_FOUND,
            GameError::Move(_) => StatusCode::BAD_REQUEST,
            GameError::Db(_) | GameError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
