//! Handler for `GET /health`.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:    &'static str,
  pub message:   &'static str,
  pub timestamp: String,
}

/// `GET /health`
pub async fn handler() -> Json<Health> {
  Json(Health {
    status:    "ok",
    message:   "mayday alert relay is running",
    timestamp: Utc::now().to_rfc3339(),
  })
}
