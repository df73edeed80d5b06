//! roster server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the roster JSON API over HTTP.

mod seed;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roster_api::ApiState;
use roster_core::event::EventBus;
use roster_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  seed::WhereisSeed,
  settings::{ServerConfig, expand_tilde},
};

#[derive(Parser)]
#[command(author, version, about = "Roster alt-group and channel server")]
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
  let server_cfg = ServerConfig::load(&cli.config)?;

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(seed_path) = &server_cfg.whereis_seed {
    WhereisSeed::read(&expand_tilde(seed_path))?
      .apply(&store)
      .await?;
  }

  // Events have no remote consumers yet; log them.
  let bus = Arc::new(EventBus::new());
  bus.subscribe(|event_type, payload| {
    tracing::info!(event_type, %payload, "event");
  });

  let state = ApiState::new(Arc::new(store), bus);
  let app = roster_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
