//! The alert pipeline — coordinates one SOS request end to end.
//!
//! Validate, look the subject up, persist the alert, then fan out to the two
//! notification channels. Channel faults are contained at the channel seam;
//! only validation, lookup, and persistence failures surface to the caller.

use futures::join;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  alert::{AlertContext, NewAlert},
  channel::NotifyChannel,
  error::{Error, Result},
  store::{AlertStore, SubjectStore},
};

// ─── Request / outcome ───────────────────────────────────────────────────────

/// The raw, unvalidated request. Every field is optional so presence is
/// checked explicitly, not inferred from a default value — a coordinate of
/// `0.0` is valid.
#[derive(Debug, Clone, Default)]
pub struct AlertRequest {
  pub latitude:   Option<f64>,
  pub longitude:  Option<f64>,
  pub subject_id: Option<String>,
}

impl AlertRequest {
  fn validate(self) -> Result<(f64, f64, String)> {
    let latitude = self.latitude.ok_or(Error::MissingField("lat"))?;
    let longitude = self.longitude.ok_or(Error::MissingField("lon"))?;
    let subject_id = match self.subject_id {
      Some(id) if !id.trim().is_empty() => id,
      _ => return Err(Error::MissingField("userId")),
    };
    Ok((latitude, longitude, subject_id))
  }
}

/// What the pipeline reports back for one processed alert. Notification
/// outcomes are data here, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOutcome {
  pub alert_id:        Uuid,
  pub push_delivered:  bool,
  pub email_delivered: bool,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Coordinates validation, lookup, persistence, and notification fan-out.
///
/// All four collaborators are injected, so tests can substitute doubles for
/// any of them.
pub struct AlertPipeline<R, A, P, E> {
  subjects: R,
  alerts:   A,
  push:     P,
  email:    E,
}

impl<R, A, P, E> AlertPipeline<R, A, P, E>
where
  R: SubjectStore,
  A: AlertStore,
  P: NotifyChannel,
  E: NotifyChannel,
{
  pub fn new(subjects: R, alerts: A, push: P, email: E) -> Self {
    Self { subjects, alerts, push, email }
  }

  /// Process one SOS request.
  ///
  /// Fails only on incomplete input, an unknown subject, or a store error.
  /// Validation and lookup short-circuit before the write; a write failure
  /// short-circuits before fan-out.
  pub async fn process(&self, request: AlertRequest) -> Result<AlertOutcome> {
    let (latitude, longitude, subject_id) = request.validate().map_err(|e| {
      warn!(error = %e, "rejecting incomplete alert request");
      e
    })?;

    let subject = self
      .subjects
      .get_subject(&subject_id)
      .await
      .map_err(|e| {
        warn!(subject_id = %subject_id, stage = "lookup", error = %e, "store failure");
        Error::store(e)
      })?
      .ok_or_else(|| {
        warn!(subject_id = %subject_id, "alert for unknown subject");
        Error::SubjectNotFound(subject_id.clone())
      })?;

    let record = self
      .alerts
      .add_alert(NewAlert::capture(&subject, latitude, longitude))
      .await
      .map_err(|e| {
        warn!(subject_id = %subject_id, stage = "persist", error = %e, "store failure");
        Error::store(e)
      })?;

    info!(subject_id = %subject_id, alert_id = %record.alert_id, "alert recorded");

    // The channels are independent and share no mutable state; both are
    // awaited to completion regardless of either outcome.
    let context = AlertContext {
      alert_id:  record.alert_id,
      subject,
      latitude,
      longitude,
      raised_at: record.created_at,
    };
    let (push_delivered, email_delivered) =
      join!(self.push.attempt(&context), self.email.attempt(&context));

    Ok(AlertOutcome {
      alert_id: record.alert_id,
      push_delivered,
      email_delivered,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use chrono::Utc;

  use crate::{alert::AlertRecord, subject::Subject};

  #[derive(Clone)]
  struct FixedSubjects(Option<Subject>);

  impl SubjectStore for FixedSubjects {
    type Error = std::io::Error;

    async fn get_subject(&self, _id: &str) -> Result<Option<Subject>, Self::Error> {
      Ok(self.0.clone())
    }
  }

  #[derive(Clone, Default)]
  struct RecordingAlerts {
    writes: Arc<AtomicUsize>,
    fail:   bool,
  }

  impl AlertStore for RecordingAlerts {
    type Error = std::io::Error;

    async fn add_alert(&self, input: NewAlert) -> Result<AlertRecord, Self::Error> {
      if self.fail {
        return Err(std::io::Error::other("alerts table offline"));
      }
      self.writes.fetch_add(1, Ordering::SeqCst);
      Ok(AlertRecord {
        alert_id:      Uuid::new_v4(),
        subject_id:    input.subject_id,
        subject_name:  input.subject_name,
        subject_email: input.subject_email,
        subject_phone: input.subject_phone,
        latitude:      input.latitude,
        longitude:     input.longitude,
        status:        input.status,
        resolved:      input.resolved,
        created_at:    Utc::now(),
      })
    }
  }

  #[derive(Clone)]
  struct StubChannel {
    delivered: bool,
    calls:     Arc<AtomicUsize>,
  }

  impl StubChannel {
    fn new(delivered: bool) -> Self {
      Self { delivered, calls: Arc::new(AtomicUsize::new(0)) }
    }
  }

  impl NotifyChannel for StubChannel {
    fn name(&self) -> &'static str { "stub" }

    async fn attempt(&self, _alert: &AlertContext) -> bool {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.delivered
    }
  }

  fn subject() -> Subject {
    Subject {
      id:    "S123".to_owned(),
      name:  Some("Asha".to_owned()),
      email: Some("a@x.com".to_owned()),
      phone: None,
      emergency_contacts: vec![],
    }
  }

  fn request() -> AlertRequest {
    AlertRequest {
      latitude:   Some(22.59),
      longitude:  Some(88.36),
      subject_id: Some("S123".to_owned()),
    }
  }

  #[tokio::test]
  async fn valid_request_writes_and_notifies() {
    let alerts = RecordingAlerts::default();
    let writes = alerts.writes.clone();
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      alerts,
      StubChannel::new(true),
      StubChannel::new(true),
    );

    let outcome = pipeline.process(request()).await.unwrap();
    assert!(outcome.push_delivered);
    assert!(outcome.email_delivered);
    assert_eq!(writes.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn repeated_requests_get_distinct_ids() {
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      RecordingAlerts::default(),
      StubChannel::new(true),
      StubChannel::new(true),
    );

    let first = pipeline.process(request()).await.unwrap();
    let second = pipeline.process(request()).await.unwrap();
    assert_ne!(first.alert_id, second.alert_id);
  }

  #[tokio::test]
  async fn missing_field_is_rejected_without_write() {
    let alerts = RecordingAlerts::default();
    let writes = alerts.writes.clone();
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      alerts,
      StubChannel::new(true),
      StubChannel::new(true),
    );

    for request in [
      AlertRequest { latitude: None, ..request() },
      AlertRequest { longitude: None, ..request() },
      AlertRequest { subject_id: None, ..request() },
      AlertRequest { subject_id: Some("  ".to_owned()), ..request() },
    ] {
      let err = pipeline.process(request).await.unwrap_err();
      assert!(matches!(err, Error::MissingField(_)), "got {err:?}");
    }
    assert_eq!(writes.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn zero_coordinates_are_valid() {
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      RecordingAlerts::default(),
      StubChannel::new(true),
      StubChannel::new(true),
    );

    let request = AlertRequest {
      latitude:  Some(0.0),
      longitude: Some(0.0),
      ..request()
    };
    assert!(pipeline.process(request).await.is_ok());
  }

  #[tokio::test]
  async fn unknown_subject_is_not_found_without_write() {
    let alerts = RecordingAlerts::default();
    let writes = alerts.writes.clone();
    let pipeline = AlertPipeline::new(
      FixedSubjects(None),
      alerts,
      StubChannel::new(true),
      StubChannel::new(true),
    );

    let err = pipeline.process(request()).await.unwrap_err();
    assert!(matches!(err, Error::SubjectNotFound(ref id) if id == "S123"));
    assert_eq!(writes.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn write_failure_skips_fanout() {
    let push = StubChannel::new(true);
    let email = StubChannel::new(true);
    let push_calls = push.calls.clone();
    let email_calls = email.calls.clone();
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      RecordingAlerts { fail: true, ..Default::default() },
      push,
      email,
    );

    let err = pipeline.process(request()).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert_eq!(push_calls.load(Ordering::SeqCst), 0);
    assert_eq!(email_calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn failed_channel_does_not_affect_the_other() {
    let email = StubChannel::new(true);
    let email_calls = email.calls.clone();
    let pipeline = AlertPipeline::new(
      FixedSubjects(Some(subject())),
      RecordingAlerts::default(),
      StubChannel::new(false),
      email,
    );

    let outcome = pipeline.process(request()).await.unwrap();
    assert!(!outcome.push_delivered);
    assert!(outcome.email_delivered);
    assert_eq!(email_calls.load(Ordering::SeqCst), 1);
  }
}
