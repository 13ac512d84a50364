//! One search session: the active filters, pagination, and the result query.

use crate::cache::{CacheResult, QueryKey};
use crate::query::{Query, QueryState};

use super::cache::JobsQueryKey;
use super::cached_client::CachedAdzunaClient;
use super::filters::{page_count, SearchFilters, PAGE_SIZE};
use super::types::JobPage;

pub type JobsState = QueryState<CacheResult<JobPage>>;

/// Drives the job list.
///
/// Starts on the unfiltered home listing. Every trigger (submit, filter change,
/// page change, refresh) starts a new request; a response that arrives after a
/// newer trigger is dropped by the underlying `Query`.
pub struct SearchSession {
  client: CachedAdzunaClient,
  key: JobsQueryKey,
  query: Query<CacheResult<JobPage>>,
  /// Total from the last successful response, kept while the next page loads
  last_count: Option<u64>,
}

impl SearchSession {
  pub fn new(client: CachedAdzunaClient) -> Self {
    let key = JobsQueryKey::Home;
    let query = Query::new(fetcher(client.clone(), key.clone()));
    Self {
      client,
      key,
      query,
      last_count: None,
    }
  }

  /// Start a session directly on a search.
  pub fn with_query(client: CachedAdzunaClient, text: &str) -> Self {
    let mut session = Self::new(client);
    session.submit(text);
    session
  }

  pub fn key(&self) -> &JobsQueryKey {
    &self.key
  }

  /// Active filters, `None` while on the home listing.
  pub fn filters(&self) -> Option<&SearchFilters> {
    match &self.key {
      JobsQueryKey::Home => None,
      JobsQueryKey::Search(filters) => Some(filters),
    }
  }

  pub fn state(&self) -> &JobsState {
    self.query.state()
  }

  pub fn current_page(&self) -> u32 {
    self.filters().map_or(1, |f| f.page)
  }

  /// ceil(count / 30), at least 1. Uses the last known count while loading.
  pub fn page_count(&self) -> u32 {
    page_count(self.last_count.unwrap_or(0), PAGE_SIZE)
  }

  /// Load the current key if nothing has been requested yet.
  pub fn start(&mut self) {
    if matches!(self.query.state(), QueryState::Idle) {
      self.query.fetch();
    }
  }

  /// Submit free text. Keeps the structured filters and resets to page 1.
  /// Empty text with no filters goes back to the home listing.
  pub fn submit(&mut self, text: &str) {
    let mut filters = self.filters().cloned().unwrap_or_default();
    filters.query = text.trim().to_string();
    self.search(filters);
  }

  /// Replace the structured filters, keeping the current text. Resets to page 1.
  pub fn apply_filters(&mut self, filters: SearchFilters) {
    let query = self
      .filters()
      .map(|f| f.query.clone())
      .unwrap_or_default();
    self.search(SearchFilters { query, ..filters });
  }

  /// Jump to `page`. Pages past the end are requested anyway.
  pub fn set_page(&mut self, page: u32) {
    let filters = self.filters().cloned().unwrap_or_default().with_page(page);
    if filters.page == 1 && filters.query.is_empty() && filters.is_unfiltered() {
      self.trigger(JobsQueryKey::Home);
    } else {
      self.trigger(JobsQueryKey::Search(filters));
    }
  }

  /// Returns false when already on the last known page.
  pub fn next_page(&mut self) -> bool {
    let page = self.current_page();
    if page >= self.page_count() {
      return false;
    }
    self.set_page(page + 1);
    true
  }

  /// Returns false on page 1.
  pub fn prev_page(&mut self) -> bool {
    let page = self.current_page();
    if page <= 1 {
      return false;
    }
    self.set_page(page - 1);
    true
  }

  /// Re-run the current key. A cached entry is still served from cache.
  pub fn refresh(&mut self) {
    self.query.refetch();
  }

  /// Drain finished requests. Returns true when the state changed.
  pub fn poll(&mut self) -> bool {
    let changed = self.query.poll();
    if let Some(result) = self.query.data() {
      self.last_count = Some(result.data.count);
    }
    changed
  }

  fn search(&mut self, filters: SearchFilters) {
    // Total belongs to the previous filters; only page changes keep it
    self.last_count = None;
    let filters = filters.with_page(1);
    if filters.query.is_empty() && filters.is_unfiltered() {
      self.trigger(JobsQueryKey::Home);
    } else {
      self.trigger(JobsQueryKey::Search(filters));
    }
  }

  fn trigger(&mut self, key: JobsQueryKey) {
    tracing::debug!(query = %key.description(), "jobs query triggered");

    self
      .query
      .set_fetcher(fetcher(self.client.clone(), key.clone()));
    self.key = key;
    self.query.refetch();
  }
}

fn fetcher(
  client: CachedAdzunaClient,
  key: JobsQueryKey,
) -> impl Fn() -> futures::future::BoxFuture<'static, Result<CacheResult<JobPage>, String>>
     + Send
     + Sync
     + 'static {
  move || {
    let client = client.clone();
    let key = key.clone();
    Box::pin(async move {
      client.fetch(&key).await.map_err(|e| {
        tracing::warn!(error = %e, "failed to fetch jobs");
        e.user_message("jobs")
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adzuna::client::AdzunaClient;
  use crate::adzuna::filters::JobType;
  use crate::cache::{CacheLayer, CacheSource, CacheStore, MemoryStorage};
  use std::sync::Arc;
  use std::time::Duration;
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn session(server: &MockServer) -> SearchSession {
    let inner = AdzunaClient::with_credentials(&server.uri(), "us", "id", "key").unwrap();
    let store = CacheStore::new(Arc::new(MemoryStorage::new()));
    let client = CachedAdzunaClient::new(inner, CacheLayer::new(store), chrono::Duration::hours(1));
    SearchSession::new(client)
  }

  async fn settle(session: &mut SearchSession) {
    for _ in 0..200 {
      session.poll();
      if !session.state().is_loading() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  }

  fn listing(n: usize, count: u64) -> serde_json::Value {
    let results: Vec<_> = (0..n)
      .map(|i| serde_json::json!({"id": i.to_string(), "title": format!("Job {}", i)}))
      .collect();
    serde_json::json!({"results": results, "count": count})
  }

  #[tokio::test]
  async fn test_engineer_search_paginates_with_distinct_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/search/1"))
      .and(query_param("what", "engineer"))
      .respond_with(ResponseTemplate::new(200).set_body_json(listing(30, 45)))
      .expect(1)
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/search/2"))
      .and(query_param("what", "engineer"))
      .respond_with(ResponseTemplate::new(200).set_body_json(listing(15, 45)))
      .expect(1)
      .mount(&server)
      .await;

    let mut session = session(&server);
    session.submit("engineer");
    assert!(session.state().is_loading());

    settle(&mut session).await;
    let page_one_key = session.key().cache_hash();
    assert_eq!(session.state().data().unwrap().data.results.len(), 30);
    assert_eq!(session.page_count(), 2);

    assert!(session.next_page());
    assert_eq!(session.current_page(), 2);
    assert_ne!(session.key().cache_hash(), page_one_key);
    // Page count survives while the next page loads
    assert_eq!(session.page_count(), 2);

    settle(&mut session).await;
    assert_eq!(session.state().data().unwrap().data.results.len(), 15);
    assert!(!session.next_page());

    // Back to page 1 is served from cache
    assert!(session.prev_page());
    settle(&mut session).await;
    assert_eq!(
      session.state().data().unwrap().source,
      CacheSource::Cache
    );
  }

  #[tokio::test]
  async fn test_starts_on_home_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/search/1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(listing(3, 3)))
      .mount(&server)
      .await;

    let mut session = session(&server);
    assert!(matches!(session.state(), QueryState::Idle));
    session.start();
    settle(&mut session).await;

    assert_eq!(session.key(), &JobsQueryKey::Home);
    assert_eq!(session.page_count(), 1);
    assert!(!session.prev_page());
  }

  #[tokio::test]
  async fn test_failure_surfaces_user_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(502))
      .mount(&server)
      .await;

    let mut session = session(&server);
    session.submit("nurse");
    settle(&mut session).await;

    assert_eq!(
      session.state().error(),
      Some("Failed to fetch jobs. Please try again later.")
    );
  }

  #[tokio::test]
  async fn test_filters_and_text_combine_and_reset_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_json(listing(0, 0)))
      .mount(&server)
      .await;

    let mut session = session(&server);
    session.submit("chef");
    session.set_page(4);
    assert_eq!(session.current_page(), 4);

    let mut filters = SearchFilters::default();
    filters.toggle_job_type(JobType::PartTime);
    session.apply_filters(filters);

    let active = session.filters().unwrap();
    assert_eq!(active.query, "chef");
    assert_eq!(active.page, 1);
    assert!(active.job_types.contains(&JobType::PartTime));

    // Clearing the text keeps the structured filters
    session.submit("  ");
    assert!(session.filters().is_some());

    session.apply_filters(SearchFilters::default());
    assert_eq!(session.key(), &JobsQueryKey::Home);
  }

  #[tokio::test]
  async fn test_new_search_forgets_previous_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(query_param("what", "welder"))
      .respond_with(ResponseTemplate::new(200).set_body_json(listing(30, 90)))
      .mount(&server)
      .await;
    Mock::given(method("GET"))
      .and(query_param("what", "baker"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let mut session = session(&server);
    session.submit("welder");
    settle(&mut session).await;
    assert_eq!(session.page_count(), 3);

    session.submit("baker");
    assert_eq!(session.page_count(), 1);
    settle(&mut session).await;
    assert!(session.state().error().is_some());
    assert_eq!(session.page_count(), 1);
    assert!(!session.next_page());
  }
}
