//! Cache keys for job search API calls.

use sha2::{Digest, Sha256};
use std::fmt::Write;

use crate::cache::QueryKey;

use super::filters::SearchFilters;

/// Query key types for job API calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobsQueryKey {
  /// Unfiltered first page shown at startup
  Home,
  /// Any query/filter/page combination
  Search(SearchFilters),
}

impl JobsQueryKey {
  /// Canonical pre-hash form.
  ///
  /// Fields go in a fixed order and each is length-prefixed, so no value can
  /// smuggle in a delimiter and collide with another combination.
  fn canonical(&self) -> String {
    match self {
      Self::Home => "home".to_string(),
      Self::Search(filters) => {
        let job_types = filters
          .job_types
          .iter()
          .map(|t| t.label())
          .collect::<Vec<_>>()
          .join(",");
        let min_salary = filters
          .min_salary
          .map(|s| s.to_string())
          .unwrap_or_else(|| "-".to_string());
        let experience = filters.experience.map(|e| e.keyword()).unwrap_or("-");
        let page = filters.page.to_string();

        let mut out = String::from("search");
        for field in [
          filters.query.as_str(),
          page.as_str(),
          job_types.as_str(),
          min_salary.as_str(),
          experience,
        ] {
          let _ = write!(out, "|{}:{}", field.len(), field);
        }
        out
      }
    }
  }
}

impl QueryKey for JobsQueryKey {
  fn cache_hash(&self) -> String {
    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(self.canonical().as_bytes());
    hex::encode(hasher.finalize())
  }

  fn description(&self) -> String {
    match self {
      Self::Home => "home listing".to_string(),
      Self::Search(filters) => {
        let mut desc = format!("search '{}' page {}", filters.query, filters.page);
        if !filters.job_types.is_empty() {
          let types: Vec<_> = filters.job_types.iter().map(|t| t.label()).collect();
          let _ = write!(desc, " [{}]", types.join(", "));
        }
        if let Some(min) = filters.min_salary {
          let _ = write!(desc, " min ${}", min);
        }
        if let Some(level) = filters.experience {
          let _ = write!(desc, " {}", level.label());
        }
        desc
      }
    }
  }
}
