//! Push channel — one broadcast notification per alert via the push
//! provider's REST API.

use std::time::Duration;

use mayday_core::{alert::AlertContext, channel::NotifyChannel};
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DispatchError, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Endpoint and credentials for the push provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
  pub endpoint: String,
  pub app_id:   String,
  pub api_key:  String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// Payload for one broadcast notification.
#[derive(Debug, Serialize)]
struct BroadcastPayload {
  app_id:            String,
  included_segments: Vec<&'static str>,
  headings:          LocalizedText,
  contents:          LocalizedText,
  data:              DeepLink,
}

#[derive(Debug, Serialize)]
struct LocalizedText {
  en: String,
}

/// Carried verbatim to the client app so it can deep-link to the alert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeepLink {
  subject_id: String,
  latitude:   f64,
  longitude:  f64,
  alert_id:   String,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
  /// Provider-assigned notification id; empty when the broadcast was
  /// rejected even under a 2xx status.
  #[serde(default)]
  id:     String,
  #[serde(default)]
  errors: Vec<serde_json::Value>,
}

// ─── Channel ─────────────────────────────────────────────────────────────────

/// Broadcasts a push notification for each alert.
///
/// Without credentials the channel runs in a degraded no-op mode: every
/// attempt logs a configuration warning and reports `false`.
#[derive(Clone)]
pub struct PushChannel {
  client: Client,
  config: Option<PushConfig>,
}

impl PushChannel {
  pub fn new(config: Option<PushConfig>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { client, config })
  }

  fn payload(config: &PushConfig, alert: &AlertContext) -> BroadcastPayload {
    let name = alert.subject.display_name();
    BroadcastPayload {
      app_id:            config.app_id.clone(),
      included_segments: vec!["All"],
      headings:          LocalizedText { en: "SOS Alert".to_owned() },
      contents:          LocalizedText {
        en: format!(
          "{name} needs help at ({:.5}, {:.5})",
          alert.latitude, alert.longitude
        ),
      },
      data:              DeepLink {
        subject_id: alert.subject.id.clone(),
        latitude:   alert.latitude,
        longitude:  alert.longitude,
        alert_id:   alert.alert_id.to_string(),
      },
    }
  }

  async fn dispatch(
    &self,
    config: &PushConfig,
    alert: &AlertContext,
  ) -> std::result::Result<String, DispatchError> {
    let resp = self
      .client
      .post(&config.endpoint)
      .header(
        header::AUTHORIZATION,
        format!("Basic {}", config.api_key),
      )
      .json(&Self::payload(config, alert))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let detail = resp.text().await.unwrap_or_default();
      return Err(DispatchError::Provider { status, detail });
    }

    let body: ProviderResponse = resp.json().await?;
    if body.id.is_empty() {
      return Err(DispatchError::MissingId {
        detail: serde_json::to_string(&body.errors).unwrap_or_default(),
      });
    }
    Ok(body.id)
  }
}

impl NotifyChannel for PushChannel {
  fn name(&self) -> &'static str { "push" }

  async fn attempt(&self, alert: &AlertContext) -> bool {
    let Some(config) = &self.config else {
      warn!(channel = self.name(), "no credentials configured, skipping broadcast");
      return false;
    };

    match self.dispatch(config, alert).await {
      Ok(notification_id) => {
        debug!(
          channel = self.name(),
          alert_id = %alert.alert_id,
          notification_id = %notification_id,
          "broadcast accepted"
        );
        true
      }
      Err(e) => {
        warn!(
          channel = self.name(),
          alert_id = %alert.alert_id,
          error = %e,
          "broadcast failed"
        );
        false
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
