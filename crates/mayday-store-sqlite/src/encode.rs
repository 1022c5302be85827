//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and the emergency-contact list as compact JSON.

use chrono::{DateTime, Utc};
use mayday_core::{
  alert::{AlertRecord, AlertStatus},
  subject::Subject,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── AlertStatus ─────────────────────────────────────────────────────────────

pub fn encode_status(s: AlertStatus) -> &'static str {
  match s {
    AlertStatus::Active => "active",
    AlertStatus::Resolved => "resolved",
  }
}

pub fn decode_status(s: &str) -> Result<AlertStatus> {
  match s {
    "active" => Ok(AlertStatus::Active),
    "resolved" => Ok(AlertStatus::Resolved),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `subjects` row.
pub struct RawSubject {
  pub subject_id:    String,
  pub name:          Option<String>,
  pub email:         Option<String>,
  pub phone:         Option<String>,
  pub contacts_json: String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:    self.subject_id,
      name:  self.name,
      email: self.email,
      phone: self.phone,
      emergency_contacts: serde_json::from_str(&self.contacts_json)?,
    })
  }
}

/// Raw strings read directly from an `alerts` row.
pub struct RawAlert {
  pub alert_id:      String,
  pub subject_id:    String,
  pub subject_name:  String,
  pub subject_email: String,
  pub subject_phone: String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub status:        String,
  pub resolved:      bool,
  pub created_at:    String,
}

impl RawAlert {
  pub fn into_record(self) -> Result<AlertRecord> {
    Ok(AlertRecord {
      alert_id:      decode_uuid(&self.alert_id)?,
      subject_id:    self.subject_id,
      subject_name:  self.subject_name,
      subject_email: self.subject_email,
      subject_phone: self.subject_phone,
      latitude:      self.latitude,
      longitude:     self.longitude,
      status:        decode_status(&self.status)?,
      resolved:      self.resolved,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
