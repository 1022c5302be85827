//! Email channel — alerts the subject's emergency contacts via the email
//! provider's REST API.

use std::time::Duration;

use mayday_core::{
  alert::AlertContext,
  channel::NotifyChannel,
  subject::Subject,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DispatchError, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Endpoint, credentials, and sender identity for the email provider.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
  pub endpoint:     String,
  pub api_key:      String,
  pub sender_name:  String,
  pub sender_email: String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Party {
  email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  name:  Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailPayload {
  sender:       Party,
  to:           Vec<Party>,
  subject:      String,
  html_content: String,
  text_content: String,
}

// ─── Recipient policy ────────────────────────────────────────────────────────

/// Emergency contacts' addresses first (empty and missing ones filtered
/// out); the subject's own address only as a fallback when no contact is
/// reachable. May legitimately come back empty.
fn recipients(subject: &Subject) -> Vec<Party> {
  let contacts: Vec<Party> = subject
    .emergency_contacts
    .iter()
    .filter_map(|c| {
      let email = c.email.as_deref()?.trim();
      (!email.is_empty()).then(|| Party {
        email: email.to_owned(),
        name:  Some(c.name.clone()),
      })
    })
    .collect();

  if !contacts.is_empty() {
    return contacts;
  }

  subject
    .email
    .as_deref()
    .map(str::trim)
    .filter(|e| !e.is_empty())
    .map(|e| {
      vec![Party { email: e.to_owned(), name: subject.name.clone() }]
    })
    .unwrap_or_default()
}

// ─── Body rendering ──────────────────────────────────────────────────────────

fn map_link(latitude: f64, longitude: f64) -> String {
  format!("https://www.google.com/maps?q={latitude},{longitude}")
}

/// Render the `(html, text)` bodies for one alert.
fn render_bodies(alert: &AlertContext) -> (String, String) {
  let name = alert.subject.display_name();
  let id = &alert.subject.id;
  let phone = alert
    .subject
    .phone
    .as_deref()
    .filter(|p| !p.trim().is_empty())
    .unwrap_or("not provided");
  let when = alert.raised_at.format("%Y-%m-%d %H:%M:%S UTC");
  let link = map_link(alert.latitude, alert.longitude);

  let text = format!(
    "SOS alert from {name} (id {id})\n\
     Time: {when}\n\
     Location: {lat}, {lon}\n\
     Phone: {phone}\n\
     Map: {link}\n",
    lat = alert.latitude,
    lon = alert.longitude,
  );

  let html = format!(
    "<h2>SOS alert from {name}</h2>\
     <p><strong>Subject id:</strong> {id}</p>\
     <p><strong>Time:</strong> {when}</p>\
     <p><strong>Location:</strong> {lat}, {lon}</p>\
     <p><strong>Phone:</strong> {phone}</p>\
     <p><a href=\"{link}\">Open location in maps</a></p>",
    lat = alert.latitude,
    lon = alert.longitude,
  );

  (html, text)
}

// ─── Channel ─────────────────────────────────────────────────────────────────

/// Emails the subject's emergency contacts about each alert.
///
/// Without credentials the channel runs in a degraded no-op mode. A subject
/// with no usable recipient addresses also skips the provider call entirely.
#[derive(Clone)]
pub struct EmailChannel {
  client: Client,
  config: Option<EmailConfig>,
}

impl EmailChannel {
  pub fn new(config: Option<EmailConfig>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { client, config })
  }

  async fn dispatch(
    &self,
    config: &EmailConfig,
    alert: &AlertContext,
    to: Vec<Party>,
  ) -> std::result::Result<(), DispatchError> {
    let (html_content, text_content) = render_bodies(alert);
    let payload = EmailPayload {
      sender: Party {
        email: config.sender_email.clone(),
        name:  Some(config.sender_name.clone()),
      },
      to,
      subject: format!("SOS alert from {}", alert.subject.display_name()),
      html_content,
      text_content,
    };

    let resp = self
      .client
      .post(&config.endpoint)
      .header("api-key", config.api_key.as_str())
      .json(&payload)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let detail = resp.text().await.unwrap_or_default();
      return Err(DispatchError::Provider { status, detail });
    }
    Ok(())
  }
}

impl NotifyChannel for EmailChannel {
  fn name(&self) -> &'static str { "email" }

  async fn attempt(&self, alert: &AlertContext) -> bool {
    let Some(config) = &self.config else {
      warn!(channel = self.name(), "no credentials configured, skipping alert email");
      return false;
    };

    let to = recipients(&alert.subject);
    if to.is_empty() {
      warn!(
        channel = self.name(),
        subject_id = %alert.subject.id,
        "no usable recipient addresses, skipping alert email"
      );
      return false;
    }

    match self.dispatch(config, alert, to).await {
      Ok(()) => {
        debug!(
          channel = self.name(),
          alert_id = %alert.alert_id,
          "alert email accepted"
        );
        true
      }
      Err(e) => {
        warn!(
          channel = self.name(),
          alert_id = %alert.alert_id,
          error = %e,
          "alert email failed"
        );
        false
      }
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
