//! `gridcache` — CLI for the F1 results cache.
//!
//! # Usage
//!
//! ```text
//! gridcache refresh --seasons 2005:2025 --db gridcache.db
//! gridcache serve --config config.toml
//! ```
//!
//! `refresh` talks to the Jolpica Ergast-compatible API and reconciles
//! seasons, races and winners into a local SQLite cache; `serve` exposes the
//! JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gridcache_client::{ClientConfig, JolpicaClient};
use gridcache_core::range::SeasonRange;
use gridcache_refresh::RefreshSummary;
use gridcache_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gridcache", version, about = "Local cache for F1 race results")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch seasons, races and winners from the results API into the cache.
  Refresh {
    /// Season range in START:END form (example: 2005:2025).
    /// Default: 2005 through the latest available season.
    #[arg(long)]
    seasons: Option<String>,

    /// Path to the SQLite database file.
    #[arg(long, default_value = "gridcache.db")]
    db: PathBuf,

    /// Base URL of the results API.
    #[arg(long)]
    base_url: Option<String>,
  },

  /// Serve the JSON API over HTTP.
  Serve {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
  },
}

// ─── Server config ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `GRIDCACHE_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ServerConfig {
  host:     String,
  port:     u16,
  db_path:  PathBuf,
  base_url: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:     "127.0.0.1".to_owned(),
      port:     8080,
      db_path:  PathBuf::from("gridcache.db"),
      base_url: None,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  match cli.command {
    Command::Refresh { seasons, db, base_url } => run_refresh(seasons, db, base_url).await,
    Command::Serve { config } => run_serve(config).await,
  }
}

// ─── refresh ──────────────────────────────────────────────────────────────────

async fn run_refresh(
  seasons: Option<String>,
  db: PathBuf,
  base_url: Option<String>,
) -> anyhow::Result<()> {
  // Range validation fails here, before any network call, with a non-zero
  // exit and a descriptive message.
  let range = seasons.as_deref().map(SeasonRange::parse).transpose()?;

  let client = build_client(base_url)?;
  let store = SqliteStore::open(&db)
    .await
    .with_context(|| format!("failed to open store at {}", db.display()))?;

  println!("Starting F1 data refresh...");
  let summary = gridcache_refresh::refresh(&client, &store, range)
    .await
    .context("refresh failed")?;

  print_summary(&summary);
  Ok(())
}

/// Print the summary counts and every note, warning and error. A partial
/// success must never look like a full one.
fn print_summary(summary: &RefreshSummary) {
  println!("{}", summary.short_message());
  for note in &summary.notes {
    println!("note: {note}");
  }
  for warning in &summary.warnings {
    println!("warning: {warning}");
  }
  for error in &summary.errors {
    println!("error: {error}");
  }
  if summary.has_problems() {
    println!(
      "Refresh completed with {} warnings/errors.",
      summary.warnings.len() + summary.errors.len()
    );
  }
}

// ─── serve ────────────────────────────────────────────────────────────────────

async fn run_serve(config_path: PathBuf) -> anyhow::Result<()> {
  let settings = config::Config::builder()
    .add_source(config::File::from(config_path).required(false))
    .add_source(config::Environment::with_prefix("GRIDCACHE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let client = build_client(server_cfg.base_url.clone())?;
  let store = SqliteStore::open(&server_cfg.db_path)
    .await
    .with_context(|| {
      format!("failed to open store at {}", server_cfg.db_path.display())
    })?;

  let app = gridcache_api::api_router(Arc::new(client), Arc::new(store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

fn build_client(base_url: Option<String>) -> anyhow::Result<JolpicaClient> {
  let mut config = ClientConfig::default();
  if let Some(base_url) = base_url {
    config.base_url = base_url;
  }
  JolpicaClient::new(config).context("failed to build API client")
}
