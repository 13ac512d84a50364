//! Core traits and types for the caching system.

use chrono::{DateTime, Duration, Utc};

/// A parameter combination that can be turned into a stable cache key.
pub trait QueryKey {
  /// Deterministic, fixed-length key. Equal inputs must hash equal.
  fn cache_hash(&self) -> String;

  /// Human readable form, stored next to the entry for debugging.
  fn description(&self) -> String;
}

/// How long a written entry stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlPolicy {
  /// Entry is treated as absent once the duration has elapsed
  Expires(Duration),
  /// Entry lives as long as the backing storage does
  Session,
}

impl TtlPolicy {
  /// `None` means the entry never expires. A TTL that would overflow the
  /// calendar is treated the same way.
  pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match self {
      TtlPolicy::Expires(ttl) => now.checked_add_signed(*ttl),
      TtlPolicy::Session => None,
    }
  }
}

/// A decoded cache entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
  pub payload: T,
  pub cached_at: DateTime<Utc>,
  pub expires_at: Option<DateTime<Utc>>,
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  Cache,
}
