//! Serde-deserializable types matching job API responses.
//!
//! These are kept lenient: missing or null collections default to empty so a
//! partial response still renders.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::types::{JobListing, JobPage, SalaryHistory, SalaryPoint};

#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
  #[serde(default)]
  pub results: Option<Vec<JobListing>>,
  #[serde(default)]
  pub count: Option<u64>,
}

impl From<ApiSearchResponse> for JobPage {
  fn from(response: ApiSearchResponse) -> Self {
    JobPage {
      results: response.results.unwrap_or_default(),
      count: response.count.unwrap_or(0),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ApiHistoryResponse {
  #[serde(default)]
  pub month: Option<BTreeMap<String, f64>>,
}

impl ApiHistoryResponse {
  pub fn into_history(self, category: &str) -> SalaryHistory {
    let mut points: Vec<SalaryPoint> = self
      .month
      .unwrap_or_default()
      .into_iter()
      .filter_map(|(month, salary)| match parse_month(&month) {
        Some(month) => Some(SalaryPoint { month, salary }),
        None => {
          tracing::warn!(month, "skipping unparsable salary history month");
          None
        }
      })
      .collect();

    points.sort_by_key(|p| p.month);

    SalaryHistory {
      category: category.to_string(),
      points,
    }
  }
}

/// "2024-03" -> 2024-03-01
fn parse_month(s: &str) -> Option<NaiveDate> {
  let (year, month) = s.split_once('-')?;
  NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}
