//! Error types for `mayday-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required request field was absent or blank.
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("subject not found: {0}")]
  SubjectNotFound(String),

  /// A backing store failed. Fatal for the request that hit it.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box an arbitrary backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
