mod adzuna;
mod app;
mod cache;
mod commands;
mod config;
mod error;
mod event;
mod handoff;
mod places;
mod query;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::adzuna::cached_client::CachedAdzunaClient;
use crate::adzuna::client::AdzunaClient;
use crate::cache::{CacheLayer, CacheStorage, CacheStore, MemoryStorage, NoopStorage, SqliteStorage};
use crate::config::Config;
use crate::handoff::SelectedJobHandoff;
use crate::places::PlacesClient;

#[derive(Parser, Debug)]
#[command(name = "comfortzone")]
#[command(about = "Search jobs, salary trends and nearby housing from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/comfortzone/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Start on a search for this text instead of the latest listings
  #[arg(short, long)]
  query: Option<String>,

  /// Always hit the network; nothing is read from or written to the cache
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging()?;

  let config = Config::load(args.config.as_deref())?;
  let (storage, status) = open_storage(&config, args.no_cache)?;
  tracing::info!(cache = %status, "starting");

  let store = CacheStore::new(storage);
  let jobs = CachedAdzunaClient::new(
    AdzunaClient::new(&config)?,
    CacheLayer::new(store.clone()),
    config.cache.home_ttl()?,
  );

  // The detail view needs the selection even when caching is off
  let handoff_store = if args.no_cache || !config.cache.enabled {
    CacheStore::new(Arc::new(MemoryStorage::new()))
  } else {
    store
  };

  let ctx = app::AppContext {
    jobs,
    places: PlacesClient::new(&config.places)?,
    handoff: SelectedJobHandoff::new(handoff_store),
  };

  let mut app = app::App::new(
    ctx,
    config.title().to_string(),
    status,
    args.query.as_deref(),
  );
  app.run().await?;

  Ok(())
}

/// Pick the cache backend. Returns it with a short label for the footer.
fn open_storage(config: &Config, no_cache: bool) -> Result<(Arc<dyn CacheStorage>, String)> {
  if no_cache || !config.cache.enabled {
    return Ok((Arc::new(NoopStorage), "cache: off".to_string()));
  }
  if !config.cache.persist {
    return Ok((Arc::new(MemoryStorage::new()), "cache: memory".to_string()));
  }

  let storage = match &config.cache.path {
    Some(path) => SqliteStorage::open(path)?,
    None => SqliteStorage::open_default()?,
  };
  Ok((Arc::new(storage), "cache: disk".to_string()))
}

/// Log to a file; the terminal belongs to the UI.
///
/// Level comes from `COMFORTZONE_LOG` (default `info`).
fn init_logging() -> Result<WorkerGuard> {
  let dir = dirs::data_dir()
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("comfortzone");
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let (writer, guard) =
    tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, "comfortzone.log"));
  let filter = EnvFilter::try_from_env("COMFORTZONE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true)
    .init();

  Ok(guard)
}
