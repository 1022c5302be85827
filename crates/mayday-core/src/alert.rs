//! Alert records — one persisted row per SOS event.
//!
//! Alerts are append-only: the pipeline writes each record exactly once and
//! never updates it. Subject fields are denormalized at write time so the
//! record stays meaningful if the subject record changes later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::subject::Subject;

/// Lifecycle status of an alert.
///
/// The pipeline only ever writes [`Active`](AlertStatus::Active); resolution
/// happens in responder tooling outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
  Active,
  Resolved,
}

/// Input for [`AlertStore::add_alert`](crate::store::AlertStore::add_alert).
/// The store assigns the identifier and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewAlert {
  pub subject_id:    String,
  pub subject_name:  String,
  pub subject_email: String,
  pub subject_phone: String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub status:        AlertStatus,
  pub resolved:      bool,
}

impl NewAlert {
  /// Snapshot `subject` into a new active alert at the given coordinates.
  ///
  /// An absent name becomes the `"Unknown"` sentinel; absent email and phone
  /// become empty strings, so the record is self-contained.
  pub fn capture(subject: &Subject, latitude: f64, longitude: f64) -> Self {
    Self {
      subject_id:    subject.id.clone(),
      subject_name:  subject.display_name().to_owned(),
      subject_email: subject.email.clone().unwrap_or_default(),
      subject_phone: subject.phone.clone().unwrap_or_default(),
      latitude,
      longitude,
      status:        AlertStatus::Active,
      resolved:      false,
    }
  }
}

/// A persisted SOS event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
  pub alert_id:      Uuid,
  pub subject_id:    String,
  pub subject_name:  String,
  pub subject_email: String,
  pub subject_phone: String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub status:        AlertStatus,
  pub resolved:      bool,
  /// Server-assigned, non-decreasing per store.
  pub created_at:    DateTime<Utc>,
}

/// Everything a notification channel needs about one alert — derived from
/// the persisted record plus the subject it concerns, never stored.
#[derive(Debug, Clone)]
pub struct AlertContext {
  pub alert_id:  Uuid,
  pub subject:   Subject,
  pub latitude:  f64,
  pub longitude: f64,
  pub raised_at: DateTime<Utc>,
}
