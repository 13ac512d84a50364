//! Typed, TTL-aware view over a storage backend.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::storage::{CacheStorage, StoredEntry};
use super::traits::{CacheEntry, TtlPolicy};

/// Key/value cache with read-time expiry.
///
/// Expired entries read as absent but stay in the backend until overwritten.
/// There is no capacity bound.
#[derive(Clone)]
pub struct CacheStore {
  storage: Arc<dyn CacheStorage>,
}

impl CacheStore {
  pub fn new(storage: Arc<dyn CacheStorage>) -> Self {
    Self { storage }
  }

  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>> {
    self.get_at(key, Utc::now())
  }

  /// Read `key` as of `now`.
  pub fn get_at<T: DeserializeOwned>(
    &self,
    key: &str,
    now: DateTime<Utc>,
  ) -> Result<Option<CacheEntry<T>>> {
    let Some(stored) = self.storage.load(key)? else {
      return Ok(None);
    };

    if stored.is_expired_at(now) {
      tracing::debug!(key, "cache entry expired");
      return Ok(None);
    }

    let payload = serde_json::from_slice(&stored.payload)
      .map_err(|e| eyre!("Failed to deserialize cache entry {}: {}", key, e))?;

    Ok(Some(CacheEntry {
      payload,
      cached_at: stored.cached_at,
      expires_at: stored.expires_at,
    }))
  }

  pub fn put<T: Serialize>(
    &self,
    key: &str,
    description: &str,
    payload: &T,
    ttl: TtlPolicy,
  ) -> Result<()> {
    self.put_at(key, description, payload, ttl, Utc::now())
  }

  /// Write `payload` as if it were `now`; `expires_at = now + ttl`.
  pub fn put_at<T: Serialize>(
    &self,
    key: &str,
    description: &str,
    payload: &T,
    ttl: TtlPolicy,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let payload =
      serde_json::to_vec(payload).map_err(|e| eyre!("Failed to serialize cache entry: {}", e))?;

    self.storage.save(
      key,
      description,
      &StoredEntry {
        payload,
        cached_at: now,
        expires_at: ttl.expires_at(now),
      },
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::MemoryStorage;
  use chrono::Duration;

  fn store() -> CacheStore {
    CacheStore::new(Arc::new(MemoryStorage::new()))
  }

  #[test]
  fn test_get_before_and_after_ttl() {
    let store = store();
    let now = Utc::now();
    let payload = vec!["a".to_string(), "b".to_string()];

    store
      .put_at("home", "home", &payload, TtlPolicy::Expires(Duration::hours(1)), now)
      .unwrap();

    let hit: Option<CacheEntry<Vec<String>>> =
      store.get_at("home", now + Duration::minutes(30)).unwrap();
    assert_eq!(hit.unwrap().payload, payload);

    let miss: Option<CacheEntry<Vec<String>>> =
      store.get_at("home", now + Duration::minutes(61)).unwrap();
    assert!(miss.is_none());
  }

  #[test]
  fn test_session_entries_do_not_expire() {
    let store = store();
    let now = Utc::now();
    store
      .put_at("search", "search", &42u32, TtlPolicy::Session, now)
      .unwrap();

    let hit: Option<CacheEntry<u32>> = store.get_at("search", now + Duration::days(30)).unwrap();
    assert_eq!(hit.map(|e| e.payload), Some(42));
  }

  #[test]
  fn test_absent_key() {
    let hit: Option<CacheEntry<u32>> = store().get("nope").unwrap();
    assert!(hit.is_none());
  }

  #[test]
  fn test_expired_entry_recreated_lazily() {
    let store = store();
    let now = Utc::now();
    let ttl = TtlPolicy::Expires(Duration::hours(1));
    store.put_at("home", "home", &1u32, ttl, now).unwrap();

    let later = now + Duration::hours(2);
    assert!(store.get_at::<u32>("home", later).unwrap().is_none());

    store.put_at("home", "home", &2u32, ttl, later).unwrap();
    let hit = store.get_at::<u32>("home", later).unwrap().unwrap();
    assert_eq!(hit.payload, 2);
    assert_eq!(hit.cached_at, later);
  }

  #[test]
  fn test_corrupt_payload_is_an_error() {
    let storage = Arc::new(MemoryStorage::new());
    storage
      .save(
        "bad",
        "bad",
        &StoredEntry {
          payload: b"not json".to_vec(),
          cached_at: Utc::now(),
          expires_at: None,
        },
      )
      .unwrap();

    let store = CacheStore::new(storage);
    assert!(store.get::<u32>("bad").is_err());
  }
}
