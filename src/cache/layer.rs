//! Cache layer that orchestrates caching logic with network fetching.

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;

use super::store::CacheStore;
use super::traits::{CacheResult, QueryKey, TtlPolicy};
use crate::error::FetchError;

/// Cache-first fetch orchestration.
///
/// This layer sits between the application and the network client. It is the
/// only writer of response entries.
#[derive(Clone)]
pub struct CacheLayer {
  store: CacheStore,
}

impl CacheLayer {
  pub fn new(store: CacheStore) -> Self {
    Self { store }
  }

  /// Fetch with a cache-first strategy.
  ///
  /// 1. Valid cache entry - return it, no network I/O
  /// 2. Otherwise call `fetcher` exactly once
  /// 3. On success write through with `ttl` and return the data
  /// 4. On failure return the error and leave the cache untouched
  ///
  /// Storage problems never fail the fetch: a broken read counts as a miss and
  /// a broken write is only logged.
  pub async fn fetch<K, T, F, Fut>(
    &self,
    key: &K,
    ttl: TtlPolicy,
    fetcher: F,
  ) -> Result<CacheResult<T>, FetchError>
  where
    K: QueryKey,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
  {
    let hash = key.cache_hash();

    match self.store.get::<T>(&hash) {
      Ok(Some(entry)) => {
        tracing::debug!(key = %key.description(), "cache hit");
        return Ok(CacheResult::from_cache(entry.payload, entry.cached_at));
      }
      Ok(None) => tracing::debug!(key = %key.description(), "cache miss"),
      Err(e) => {
        tracing::warn!(key = %key.description(), error = %e, "cache read failed, fetching");
      }
    }

    let data = fetcher().await.inspect_err(|e| {
      tracing::warn!(key = %key.description(), error = %e, "fetch failed");
    })?;

    if let Err(e) = self.store.put(&hash, &key.description(), &data, ttl) {
      tracing::warn!(key = %key.description(), error = %e, "cache write failed");
    }

    Ok(CacheResult::from_network(data))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::{CacheStorage, MemoryStorage, StoredEntry};
  use crate::cache::traits::CacheSource;
  use chrono::Duration;
  use color_eyre::eyre::eyre;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;

  struct TestKey(&'static str);

  impl QueryKey for TestKey {
    fn cache_hash(&self) -> String {
      self.0.to_string()
    }

    fn description(&self) -> String {
      format!("test {}", self.0)
    }
  }

  fn layer() -> CacheLayer {
    CacheLayer::new(CacheStore::new(Arc::new(MemoryStorage::new())))
  }

  #[tokio::test]
  async fn test_second_fetch_is_served_from_cache() {
    let layer = layer();
    let calls = AtomicU32::new(0);
    let calls = &calls;

    for expected_source in [CacheSource::Network, CacheSource::Cache] {
      let result = layer
        .fetch(&TestKey("k"), TtlPolicy::Session, move || async move {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok::<_, FetchError>(vec![1, 2, 3])
        })
        .await
        .unwrap();
      assert_eq!(result.data, vec![1, 2, 3]);
      assert_eq!(result.source, expected_source);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_failure_is_not_cached() {
    let layer = layer();

    let result = layer
      .fetch(&TestKey("k"), TtlPolicy::Session, || async {
        Err::<Vec<u32>, _>(FetchError::network("timeout"))
      })
      .await;
    assert_eq!(result.unwrap_err(), FetchError::network("timeout"));
    assert!(layer.store.get::<Vec<u32>>("k").unwrap().is_none());

    // Next attempt goes to the network again
    let result = layer
      .fetch(&TestKey("k"), TtlPolicy::Session, || async {
        Ok::<_, FetchError>(vec![7])
      })
      .await
      .unwrap();
    assert_eq!(result.source, CacheSource::Network);
  }

  #[tokio::test]
  async fn test_expired_entry_refetches() {
    let layer = layer();
    layer
      .store
      .put_at(
        "k",
        "k",
        &vec![1u32],
        TtlPolicy::Expires(Duration::hours(1)),
        chrono::Utc::now() - Duration::hours(2),
      )
      .unwrap();

    let result = layer
      .fetch(&TestKey("k"), TtlPolicy::Expires(Duration::hours(1)), || async {
        Ok::<_, FetchError>(vec![2u32])
      })
      .await
      .unwrap();
    assert_eq!(result.data, vec![2]);
    assert_eq!(result.source, CacheSource::Network);
  }

  struct BrokenStorage;

  impl CacheStorage for BrokenStorage {
    fn load(&self, _key: &str) -> color_eyre::Result<Option<StoredEntry>> {
      Err(eyre!("disk on fire"))
    }

    fn save(&self, _key: &str, _description: &str, _entry: &StoredEntry) -> color_eyre::Result<()> {
      Err(eyre!("disk on fire"))
    }
  }

  #[tokio::test]
  async fn test_storage_errors_degrade_to_network() {
    let layer = CacheLayer::new(CacheStore::new(Arc::new(BrokenStorage)));
    let result = layer
      .fetch(&TestKey("k"), TtlPolicy::Session, || async {
        Ok::<_, FetchError>("fresh".to_string())
      })
      .await
      .unwrap();
    assert_eq!(result.data, "fresh");
    assert_eq!(result.source, CacheSource::Network);
  }
}
