//! Error types for `mayday-notify`.

use thiserror::Error;

/// Channel construction error.
#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a single dispatch attempt failed.
///
/// Never escapes a channel: `attempt` folds it into a `false` outcome after
/// logging the detail.
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("provider returned {status}: {detail}")]
  Provider {
    status: reqwest::StatusCode,
    detail: String,
  },

  #[error("provider assigned no notification id: {detail}")]
  MissingId { detail: String },
}
