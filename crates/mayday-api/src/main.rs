//! mayday server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), applies
//! `MAYDAY_`-prefixed environment overrides, opens the SQLite store, and
//! serves the alert API over HTTP. Missing provider credentials degrade the
//! corresponding channel instead of failing startup.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use mayday_api::{ServerConfig, router};
use mayday_core::pipeline::AlertPipeline;
use mayday_notify::{EmailChannel, PushChannel};
use mayday_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "mayday SOS alert relay")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("MAYDAY").separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if server_cfg.push.is_none() {
    tracing::warn!("push provider not configured; push channel degraded");
  }
  if server_cfg.email.is_none() {
    tracing::warn!("email provider not configured; email channel degraded");
  }

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  // Build channels and the pipeline.
  let push = PushChannel::new(server_cfg.push.clone())
    .context("failed to build push channel")?;
  let email = EmailChannel::new(server_cfg.email.clone())
    .context("failed to build email channel")?;

  let pipeline =
    Arc::new(AlertPipeline::new(store.clone(), store, push, email));

  let app = router(pipeline).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
