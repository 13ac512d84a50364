//! Cache storage trait and its backends.

use chrono::{DateTime, SecondsFormat, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Raw entry as held by a backend. Payload is serialized JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
  pub payload: Vec<u8>,
  pub cached_at: DateTime<Utc>,
  pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|at| at <= now)
  }
}

/// Trait for cache storage backends.
///
/// Backends are plain key/value stores. Expiry is decided by `CacheStore`,
/// backends just keep the timestamps.
pub trait CacheStorage: Send + Sync {
  fn load(&self, key: &str) -> Result<Option<StoredEntry>>;

  /// Insert or replace. Last write wins.
  fn save(&self, key: &str, description: &str, entry: &StoredEntry) -> Result<()>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn load(&self, _key: &str) -> Result<Option<StoredEntry>> {
    Ok(None) // Always miss
  }

  fn save(&self, _key: &str, _description: &str, _entry: &StoredEntry) -> Result<()> {
    Ok(()) // Discard
  }
}

/// Session-only storage. Everything is gone when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn load(&self, key: &str) -> Result<Option<StoredEntry>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(entries.get(key).cloned())
  }

  fn save(&self, key: &str, _description: &str, entry: &StoredEntry) -> Result<()> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    entries.insert(key.to_string(), entry.clone());
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
///
/// Survives restarts, which is what keeps the home listing and the selected
/// job around between runs.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS response_cache (
    cache_key TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    payload BLOB NOT NULL,
    cached_at TEXT NOT NULL,
    expires_at TEXT
);
"#;

impl SqliteStorage {
  /// Open or create the cache database at the default location.
  pub fn open_default() -> Result<Self> {
    Self::open(&Self::default_path()?)
  }

  /// Open or create the cache database at `path`.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("comfortzone").join("cache.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

impl CacheStorage for SqliteStorage {
  fn load(&self, key: &str) -> Result<Option<StoredEntry>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let row: Option<(Vec<u8>, String, Option<String>)> = conn
      .query_row(
        "SELECT payload, cached_at, expires_at FROM response_cache WHERE cache_key = ?",
        params![key],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cache entry: {}", e))?;

    let Some((payload, cached_at, expires_at)) = row else {
      return Ok(None);
    };

    Ok(Some(StoredEntry {
      payload,
      cached_at: parse_datetime(&cached_at)?,
      expires_at: expires_at.as_deref().map(parse_datetime).transpose()?,
    }))
  }

  fn save(&self, key: &str, description: &str, entry: &StoredEntry) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO response_cache (cache_key, description, payload, cached_at, expires_at)
         VALUES (?, ?, ?, ?, ?)",
        params![
          key,
          description,
          entry.payload,
          format_datetime(entry.cached_at),
          entry.expires_at.map(format_datetime),
        ],
      )
      .map_err(|e| eyre!("Failed to store cache entry: {}", e))?;

    Ok(())
  }
}

fn format_datetime(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| eyre!("Failed to parse datetime '{}': {}", s, e))
}
