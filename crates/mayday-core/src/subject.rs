//! Subject — the person an SOS alert concerns.
//!
//! Subjects are provisioned by an external enrollment system; this core only
//! ever reads them. Absent optional fields are an ordinary, frequent state,
//! not an error.

use serde::{Deserialize, Serialize};

/// Someone to be reached when the subject raises an alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
  pub name:  String,
  /// Absent (or empty) for contacts enrolled with a phone number only.
  pub email: Option<String>,
}

/// A person known to the system, addressed by an opaque external identifier.
///
/// The identifier is immutable and unique; it is minted by the enrollment
/// system, never by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
  pub id:    String,
  pub name:  Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  #[serde(default)]
  pub emergency_contacts: Vec<EmergencyContact>,
}

impl Subject {
  /// Display name, falling back to the `"Unknown"` sentinel.
  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("Unknown")
  }
}
