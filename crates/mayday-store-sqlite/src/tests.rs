//! Integration tests for `SqliteStore` against an in-memory database.

use mayday_core::{
  alert::{AlertStatus, NewAlert},
  store::{AlertStore, SubjectStore},
  subject::{EmergencyContact, Subject},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn subject(id: &str) -> Subject {
  Subject {
    id:    id.to_owned(),
    name:  Some("Asha".to_owned()),
    email: Some("a@x.com".to_owned()),
    phone: Some("+91 98000 00000".to_owned()),
    emergency_contacts: vec![
      EmergencyContact {
        name:  "Ravi".to_owned(),
        email: Some("ravi@x.com".to_owned()),
      },
      EmergencyContact { name: "Mina".to_owned(), email: None },
    ],
  }
}

// ─── Subjects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_and_get_subject() {
  let s = store().await;
  s.upsert_subject(&subject("S123")).await.unwrap();

  let fetched = s.get_subject("S123").await.unwrap().unwrap();
  assert_eq!(fetched.id, "S123");
  assert_eq!(fetched.name.as_deref(), Some("Asha"));
  assert_eq!(fetched.emergency_contacts.len(), 2);
  assert_eq!(fetched.emergency_contacts[0].email.as_deref(), Some("ravi@x.com"));
  assert!(fetched.emergency_contacts[1].email.is_none());
}

#[tokio::test]
async fn get_subject_missing_returns_none() {
  let s = store().await;
  let result = s.get_subject("nobody").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn upsert_replaces_existing_subject() {
  let s = store().await;
  s.upsert_subject(&subject("S123")).await.unwrap();

  let mut updated = subject("S123");
  updated.name = Some("Asha Rao".to_owned());
  updated.emergency_contacts.clear();
  s.upsert_subject(&updated).await.unwrap();

  let fetched = s.get_subject("S123").await.unwrap().unwrap();
  assert_eq!(fetched.name.as_deref(), Some("Asha Rao"));
  assert!(fetched.emergency_contacts.is_empty());
}

#[tokio::test]
async fn subject_with_no_optional_fields_round_trips() {
  let s = store().await;
  let sparse = Subject {
    id:    "S999".to_owned(),
    name:  None,
    email: None,
    phone: None,
    emergency_contacts: vec![],
  };
  s.upsert_subject(&sparse).await.unwrap();

  let fetched = s.get_subject("S999").await.unwrap().unwrap();
  assert!(fetched.name.is_none());
  assert!(fetched.email.is_none());
  assert!(fetched.phone.is_none());
  assert!(fetched.emergency_contacts.is_empty());
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_alert_assigns_id_and_timestamp() {
  let s = store().await;
  let subject = subject("S123");
  s.upsert_subject(&subject).await.unwrap();

  let before = chrono::Utc::now();
  let record = s
    .add_alert(NewAlert::capture(&subject, 22.59, 88.36))
    .await
    .unwrap();

  assert_eq!(record.subject_id, "S123");
  assert_eq!(record.status, AlertStatus::Active);
  assert!(!record.resolved);
  assert!(record.created_at >= before);
}

#[tokio::test]
async fn add_alert_persists_denormalized_snapshot() {
  let s = store().await;
  let subject = subject("S123");
  s.upsert_subject(&subject).await.unwrap();

  let record = s
    .add_alert(NewAlert::capture(&subject, 22.59, 88.36))
    .await
    .unwrap();

  let fetched = s.get_alert(record.alert_id).await.unwrap().unwrap();
  assert_eq!(fetched.subject_name, "Asha");
  assert_eq!(fetched.subject_email, "a@x.com");
  assert_eq!(fetched.subject_phone, "+91 98000 00000");
  assert_eq!(fetched.latitude, 22.59);
  assert_eq!(fetched.longitude, 88.36);
  assert_eq!(fetched.created_at, record.created_at);
}

#[tokio::test]
async fn repeated_alerts_get_distinct_ids() {
  let s = store().await;
  let subject = subject("S123");
  s.upsert_subject(&subject).await.unwrap();

  let first = s
    .add_alert(NewAlert::capture(&subject, 22.59, 88.36))
    .await
    .unwrap();
  let second = s
    .add_alert(NewAlert::capture(&subject, 22.59, 88.36))
    .await
    .unwrap();

  assert_ne!(first.alert_id, second.alert_id);
  assert_eq!(s.alert_count().await.unwrap(), 2);
}

#[tokio::test]
async fn get_alert_missing_returns_none() {
  let s = store().await;
  let result = s.get_alert(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}
