//! [`SqliteStore`] — the SQLite implementation of the core store traits.

use std::path::Path;

use chrono::Utc;
use mayday_core::{
  alert::{AlertRecord, NewAlert},
  store::{AlertStore, SubjectStore},
  subject::Subject,
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawAlert, RawSubject, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A mayday store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Provisioning ──────────────────────────────────────────────────────

  /// Insert or replace a subject row.
  ///
  /// Subjects are read-only for the alert pipeline; this method exists for
  /// the enrollment-sync tooling and for tests.
  pub async fn upsert_subject(&self, subject: &Subject) -> Result<()> {
    let id            = subject.id.clone();
    let name          = subject.name.clone();
    let email         = subject.email.clone();
    let phone         = subject.phone.clone();
    let contacts_json = serde_json::to_string(&subject.emergency_contacts)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (subject_id, name, email, phone, contacts_json)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(subject_id) DO UPDATE SET
             name = excluded.name,
             email = excluded.email,
             phone = excluded.phone,
             contacts_json = excluded.contacts_json",
          rusqlite::params![id, name, email, phone, contacts_json],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Diagnostics ───────────────────────────────────────────────────────

  /// Read a single alert back by id. Not used by the pipeline — alerts are
  /// write-only there — but needed by ops tooling and tests.
  pub async fn get_alert(&self, alert_id: Uuid) -> Result<Option<AlertRecord>> {
    let id_str = encode_uuid(alert_id);

    let raw: Option<RawAlert> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT alert_id, subject_id, subject_name, subject_email,
                    subject_phone, latitude, longitude, status, resolved,
                    created_at
             FROM alerts WHERE alert_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawAlert {
                alert_id:      row.get(0)?,
                subject_id:    row.get(1)?,
                subject_name:  row.get(2)?,
                subject_email: row.get(3)?,
                subject_phone: row.get(4)?,
                latitude:      row.get(5)?,
                longitude:     row.get(6)?,
                status:        row.get(7)?,
                resolved:      row.get(8)?,
                created_at:    row.get(9)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAlert::into_record).transpose()
  }

  /// Total number of alert rows.
  pub async fn alert_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM alerts", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }
}

// ─── SubjectStore impl ───────────────────────────────────────────────────────

impl SubjectStore for SqliteStore {
  type Error = Error;

  async fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
    let id_str = id.to_owned();

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT subject_id, name, email, phone, contacts_json
             FROM subjects WHERE subject_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawSubject {
                subject_id:    row.get(0)?,
                name:          row.get(1)?,
                email:         row.get(2)?,
                phone:         row.get(3)?,
                contacts_json: row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }
}

// ─── AlertStore impl ─────────────────────────────────────────────────────────

impl AlertStore for SqliteStore {
  type Error = Error;

  async fn add_alert(&self, input: NewAlert) -> Result<AlertRecord> {
    let record = AlertRecord {
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
    };

    let alert_id_str   = encode_uuid(record.alert_id);
    let subject_id     = record.subject_id.clone();
    let subject_name   = record.subject_name.clone();
    let subject_email  = record.subject_email.clone();
    let subject_phone  = record.subject_phone.clone();
    let latitude       = record.latitude;
    let longitude      = record.longitude;
    let status_str     = encode_status(record.status).to_owned();
    let resolved       = record.resolved;
    let created_at_str = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO alerts (
             alert_id, subject_id, subject_name, subject_email, subject_phone,
             latitude, longitude, status, resolved, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            alert_id_str,
            subject_id,
            subject_name,
            subject_email,
            subject_phone,
            latitude,
            longitude,
            status_str,
            resolved,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }
}
