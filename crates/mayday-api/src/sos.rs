//! Handler for `POST /processSOS`.

use std::sync::Arc;

use axum::{Json, extract::State};
use mayday_core::{
  channel::NotifyChannel,
  pipeline::{AlertPipeline, AlertRequest},
  store::{AlertStore, SubjectStore},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The wire request. All fields optional: presence is validated in the
/// pipeline so that `0` coordinates are accepted and missing fields produce
/// a clean 400 instead of a deserialisation error.
#[derive(Debug, Deserialize)]
pub struct SosBody {
  pub lat: Option<f64>,
  pub lon: Option<f64>,
  #[serde(rename = "userId")]
  pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SosResponse {
  pub success:       bool,
  pub message:       String,
  pub alert_id:      String,
  pub notifications: Notifications,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
  pub push_notification: bool,
  pub email:             bool,
}

/// `POST /processSOS` — body: `{"lat":22.59,"lon":88.36,"userId":"S123"}`
pub async fn handler<R, A, P, E>(
  State(pipeline): State<Arc<AlertPipeline<R, A, P, E>>>,
  Json(body): Json<SosBody>,
) -> Result<Json<SosResponse>, ApiError>
where
  R: SubjectStore,
  A: AlertStore,
  P: NotifyChannel,
  E: NotifyChannel,
{
  let outcome = pipeline
    .process(AlertRequest {
      latitude:   body.lat,
      longitude:  body.lon,
      subject_id: body.user_id,
    })
    .await?;

  Ok(Json(SosResponse {
    success: true,
    message: "SOS alert processed".to_owned(),
    alert_id: outcome.alert_id.to_string(),
    notifications: Notifications {
      push_notification: outcome.push_delivered,
      email:             outcome.email_delivered,
    },
  }))
}
