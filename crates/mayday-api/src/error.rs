//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing required field: {0}")]
  Validation(&'static str),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<mayday_core::Error> for ApiError {
  fn from(e: mayday_core::Error) -> Self {
    match e {
      mayday_core::Error::MissingField(field) => ApiError::Validation(field),
      mayday_core::Error::SubjectNotFound(id) => {
        ApiError::NotFound(format!("subject {id} not found"))
      }
      mayday_core::Error::Store(e) => ApiError::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Validation(field) => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "success": false,
          "error": format!("missing required field: {field}"),
        })),
      )
        .into_response(),

      ApiError::NotFound(m) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": m })),
      )
        .into_response(),

      // Generic message outward; the underlying detail rides along for
      // operator diagnosis.
      ApiError::Internal(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "success": false,
          "error": "internal server error",
          "message": e.to_string(),
        })),
      )
        .into_response(),
    }
  }
}
