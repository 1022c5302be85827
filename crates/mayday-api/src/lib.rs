//! JSON HTTP API for the mayday alert relay.
//!
//! Exposes an axum [`Router`] over an
//! [`AlertPipeline`](mayday_core::pipeline::AlertPipeline) built from any
//! combination of store and channel implementations. TLS and transport
//! concerns are the caller's responsibility.

pub mod error;
pub mod health;
pub mod sos;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use mayday_core::{
  channel::NotifyChannel,
  pipeline::AlertPipeline,
  store::{AlertStore, SubjectStore},
};
use mayday_notify::{EmailConfig, PushConfig};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` plus
/// `MAYDAY_`-prefixed environment overrides.
///
/// Absent provider sections run the corresponding channel in degraded mode
/// rather than failing startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub push:       Option<PushConfig>,
  pub email:      Option<EmailConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `pipeline`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn router<R, A, P, E>(pipeline: Arc<AlertPipeline<R, A, P, E>>) -> Router
where
  R: SubjectStore + 'static,
  A: AlertStore + 'static,
  P: NotifyChannel + 'static,
  E: NotifyChannel + 'static,
{
  Router::new()
    .route("/processSOS", post(sos::handler::<R, A, P, E>))
    .route("/health", get(health::handler))
    .with_state(pipeline)
}

// ─── Integration tests ───────────────────────────────────────────────────────
