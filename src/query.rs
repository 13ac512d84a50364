//! Async query abstraction for data fetching from the UI thread.
//!
//! A `Query<T>` wraps a fetcher closure and tracks its state:
//! `Idle -> Loading -> {Success, Error}`, and back to `Loading` on the next
//! trigger. Fetches run on the tokio runtime and report back over a channel
//! that the event loop drains with `poll()` on each tick.
//!
//! Every fetch is tagged with a request id. Only the result for the latest id
//! is accepted, so a slow response for an earlier query can never overwrite
//! the state of a newer one.
//!
//! # Example
//!
//! ```ignore
//! let jobs = jobs_client.clone();
//! let mut query = Query::new(move || {
//!     let jobs = jobs.clone();
//!     async move { jobs.salary_history("it-jobs").await.map_err(|e| e.to_string()) }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with a user-facing message
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

type Tagged<T> = (u64, Result<T, String>);

/// Async query for data fetching with state management.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  tx: mpsc::UnboundedSender<Tagged<T>>,
  rx: mpsc::UnboundedReceiver<Tagged<T>>,
  /// Id of the most recently started fetch
  request_id: u64,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` or `refetch()` starts a request.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      tx,
      rx,
      request_id: 0,
    }
  }

  /// Swap the fetcher, e.g. when the parameters behind it changed.
  ///
  /// Does not start a request; call `refetch()` for that.
  pub fn set_fetcher<F, Fut>(&mut self, fetcher: F)
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    self.fetcher = Box::new(move || Box::pin(fetcher()));
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Start fetching data if not already loading.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Start a new request even if one is in flight. The in-flight one still
  /// runs to completion but its result is ignored.
  pub fn refetch(&mut self) {
    self.start_fetch();
  }

  /// Poll for results from pending fetches.
  ///
  /// Returns `true` if the state changed. Call this in the event loop tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;

    while let Ok((id, result)) = self.rx.try_recv() {
      if id != self.request_id || !self.state.is_loading() {
        tracing::debug!(id, latest = self.request_id, "discarding stale response");
        continue;
      }

      self.state = match result {
        Ok(data) => QueryState::Success(data),
        Err(error) => QueryState::Error(error),
      };
      changed = true;
    }

    changed
  }

  fn start_fetch(&mut self) {
    self.request_id += 1;
    self.state = QueryState::Loading;

    let id = self.request_id;
    let tx = self.tx.clone();
    let future = (self.fetcher)();
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the query may have been dropped
      let _ = tx.send((id, result));
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("request_id", &self.request_id)
      .finish_non_exhaustive()
  }
}
