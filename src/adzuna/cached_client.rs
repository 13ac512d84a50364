//! Cached job client that wraps AdzunaClient with transparent caching.

use chrono::Duration;

use crate::cache::{CacheLayer, CacheResult, TtlPolicy};
use crate::error::FetchError;

use super::cache::JobsQueryKey;
use super::client::AdzunaClient;
use super::types::{JobPage, SalaryHistory};

/// Job client with transparent caching support.
///
/// The unfiltered home listing expires after `home_ttl`; search results are
/// kept for as long as the cache storage lives.
#[derive(Clone)]
pub struct CachedAdzunaClient {
  inner: AdzunaClient,
  cache: CacheLayer,
  home_ttl: Duration,
}

impl CachedAdzunaClient {
  pub fn new(inner: AdzunaClient, cache: CacheLayer, home_ttl: Duration) -> Self {
    Self {
      inner,
      cache,
      home_ttl,
    }
  }

  pub async fn fetch(&self, key: &JobsQueryKey) -> Result<CacheResult<JobPage>, FetchError> {
    match key {
      JobsQueryKey::Home => {
        self
          .cache
          .fetch(key, TtlPolicy::Expires(self.home_ttl), || {
            self.inner.home_listing()
          })
          .await
      }
      JobsQueryKey::Search(filters) => {
        self
          .cache
          .fetch(key, TtlPolicy::Session, || self.inner.search(filters))
          .await
      }
    }
  }

  /// Salary history (not cached - one small request per category change).
  pub async fn salary_history(&self, category: &str) -> Result<SalaryHistory, FetchError> {
    self.inner.salary_history(category).await
  }
}
