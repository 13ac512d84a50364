//! Passes the selected job from the list view to the detail view.
//!
//! The job is kept in the cache storage under a reserved key so it survives a
//! restart the same way cached pages do. There is exactly one slot: selecting
//! again overwrites it, and reading does not clear it.

use color_eyre::Result;

use crate::adzuna::types::JobListing;
use crate::cache::{CacheStore, TtlPolicy};
use crate::error::FetchError;

/// Hashed cache keys are 64 hex chars, so this cannot collide with one.
const SELECTED_JOB_KEY: &str = "selected_job";

#[derive(Clone)]
pub struct SelectedJobHandoff {
  store: CacheStore,
}

impl SelectedJobHandoff {
  pub fn new(store: CacheStore) -> Self {
    Self { store }
  }

  /// Replace the stored selection.
  pub fn select(&self, job: &JobListing) -> Result<()> {
    tracing::debug!(id = ?job.id, "selected job");
    self
      .store
      .put(SELECTED_JOB_KEY, "selected job", job, TtlPolicy::Session)
  }

  /// Current selection, or `MissingSelection` when there is none.
  pub fn consume(&self) -> Result<JobListing, FetchError> {
    match self.store.get::<JobListing>(SELECTED_JOB_KEY) {
      Ok(Some(entry)) => Ok(entry.payload),
      Ok(None) => Err(FetchError::MissingSelection),
      Err(e) => {
        tracing::warn!(error = %e, "failed to read selected job");
        Err(FetchError::MissingSelection)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{MemoryStorage, SqliteStorage};
  use std::sync::Arc;

  fn job(id: &str, title: &str) -> JobListing {
    JobListing {
      id: Some(id.to_string()),
      title: Some(title.to_string()),
      ..Default::default()
    }
  }

  fn handoff() -> SelectedJobHandoff {
    SelectedJobHandoff::new(CacheStore::new(Arc::new(MemoryStorage::new())))
  }

  #[test]
  fn test_consume_without_select_is_missing() {
    let err = handoff().consume().unwrap_err();
    assert_eq!(err, FetchError::MissingSelection);
    assert_eq!(err.user_message("job"), "No job details found");
  }

  #[test]
  fn test_second_select_overwrites_first() {
    let handoff = handoff();
    handoff.select(&job("1", "Baker")).unwrap();
    handoff.select(&job("2", "Welder")).unwrap();

    let selected = handoff.consume().unwrap();
    assert_eq!(selected.title(), "Welder");
    // Reading leaves the slot in place
    assert_eq!(handoff.consume().unwrap(), selected);
  }

  #[test]
  fn test_selection_round_trips_unknown_fields() {
    let raw: JobListing = serde_json::from_str(
      r#"{"id": 77, "title": "Pilot", "contract_type": "permanent", "company": {"display_name": "Air", "__CLASS__": "x"}}"#,
    )
    .unwrap();

    let handoff = handoff();
    handoff.select(&raw).unwrap();
    let back = handoff.consume().unwrap();
    assert_eq!(back, raw);
    assert_eq!(back.id.as_deref(), Some("77"));
    assert_eq!(back.extra["contract_type"], "permanent");
  }

  #[test]
  fn test_selection_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    let first = SelectedJobHandoff::new(CacheStore::new(Arc::new(
      SqliteStorage::open(&path).unwrap(),
    )));
    first.select(&job("5", "Chef")).unwrap();
    drop(first);

    let second = SelectedJobHandoff::new(CacheStore::new(Arc::new(
      SqliteStorage::open(&path).unwrap(),
    )));
    assert_eq!(second.consume().unwrap().title(), "Chef");
  }
}
