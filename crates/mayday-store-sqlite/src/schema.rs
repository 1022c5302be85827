//! SQL schema for the mayday SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Subjects are provisioned by the enrollment pipeline; this service only
-- reads them at alert time.
CREATE TABLE IF NOT EXISTS subjects (
    subject_id    TEXT PRIMARY KEY,
    name          TEXT,
    email         TEXT,
    phone         TEXT,
    contacts_json TEXT NOT NULL DEFAULT '[]'  -- JSON array of {name, email}
);

-- Alerts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS alerts (
    alert_id      TEXT PRIMARY KEY,
    subject_id    TEXT NOT NULL REFERENCES subjects(subject_id),
    subject_name  TEXT NOT NULL,   -- snapshot at alert time
    subject_email TEXT NOT NULL,
    subject_phone TEXT NOT NULL,
    latitude      REAL NOT NULL,
    longitude     REAL NOT NULL,
    status        TEXT NOT NULL DEFAULT 'active',
    resolved      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS alerts_subject_idx ON alerts(subject_id);
CREATE INDEX IF NOT EXISTS alerts_created_idx ON alerts(created_at);

PRAGMA user_version = 1;
";
