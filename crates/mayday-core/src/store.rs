//! Store traits backing the alert pipeline.
//!
//! Implemented by storage backends (e.g. `mayday-store-sqlite`). The
//! pipeline depends on these abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  alert::{AlertRecord, NewAlert},
  subject::Subject,
};

/// Read-only access to the subject base.
///
/// Subjects are provisioned elsewhere; nothing in this core writes them.
pub trait SubjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a subject by its external identifier. Returns `None` if no
  /// subject exists for `id`.
  fn get_subject<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + 'a;
}

/// Append-only persistence for alert records.
///
/// The store assigns the alert identifier and creation timestamp. There is
/// no update or delete path.
pub trait AlertStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new alert and return it with its generated identifier.
  fn add_alert(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<AlertRecord, Self::Error>> + Send + '_;
}
