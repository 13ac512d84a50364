//! Search filter state and its translation into upstream query parameters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Results per page, both requested upstream and used for page math.
pub const PAGE_SIZE: u32 = 30;

/// Salary floors offered in the filter panel.
pub const SALARY_FLOORS: &[u32] = &[50_000, 100_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobType {
  FullTime,
  PartTime,
}

impl JobType {
  pub const ALL: [JobType; 2] = [JobType::FullTime, JobType::PartTime];

  pub fn label(&self) -> &'static str {
    match self {
      JobType::FullTime => "Full Time",
      JobType::PartTime => "Part Time",
    }
  }

  /// Upstream boolean flag name
  fn param(&self) -> &'static str {
    match self {
      JobType::FullTime => "full_time",
      JobType::PartTime => "part_time",
    }
  }
}

/// Experience level. The API has no field for it, so it is folded into the
/// free-text query as a keyword and results are approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
  Entry,
  Mid,
  Senior,
}

impl ExperienceLevel {
  pub const ALL: [ExperienceLevel; 3] = [
    ExperienceLevel::Entry,
    ExperienceLevel::Mid,
    ExperienceLevel::Senior,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      ExperienceLevel::Entry => "Entry Level",
      ExperienceLevel::Mid => "Mid Level",
      ExperienceLevel::Senior => "Senior Level",
    }
  }

  pub fn keyword(&self) -> &'static str {
    match self {
      ExperienceLevel::Entry => "entry level",
      ExperienceLevel::Mid => "mid level",
      ExperienceLevel::Senior => "senior",
    }
  }
}

/// Everything that determines one search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchFilters {
  pub query: String,
  /// 1-based
  pub page: u32,
  pub job_types: BTreeSet<JobType>,
  pub min_salary: Option<u32>,
  pub experience: Option<ExperienceLevel>,
}

impl Default for SearchFilters {
  fn default() -> Self {
    Self {
      query: String::new(),
      page: 1,
      job_types: BTreeSet::new(),
      min_salary: None,
      experience: None,
    }
  }
}

impl SearchFilters {
  pub fn new(query: impl Into<String>) -> Self {
    Self {
      query: query.into(),
      ..Self::default()
    }
  }

  /// Same filters on another page. Pages below 1 are bumped to 1; pages past
  /// the end are left alone and simply come back empty.
  pub fn with_page(&self, page: u32) -> Self {
    Self {
      page: page.max(1),
      ..self.clone()
    }
  }

  pub fn toggle_job_type(&mut self, job_type: JobType) {
    if !self.job_types.remove(&job_type) {
      self.job_types.insert(job_type);
    }
  }

  /// True when no structured filter is set (query and page aside).
  pub fn is_unfiltered(&self) -> bool {
    self.job_types.is_empty() && self.min_salary.is_none() && self.experience.is_none()
  }

  /// Free-text term sent upstream, with the experience keyword appended.
  pub fn search_term(&self) -> String {
    let query = self.query.trim();
    match self.experience {
      Some(level) if query.is_empty() => level.keyword().to_string(),
      Some(level) => format!("{} {}", query, level.keyword()),
      None => query.to_string(),
    }
  }

  /// The single job type flag sent upstream. Full Time wins over Part Time.
  pub fn job_type_flag(&self) -> Option<JobType> {
    JobType::ALL
      .into_iter()
      .find(|t| self.job_types.contains(t))
  }

  /// Query parameters for the search endpoint, credentials and page excluded.
  pub fn query_params(&self) -> Vec<(&'static str, String)> {
    let mut params = vec![("results_per_page", PAGE_SIZE.to_string())];

    let term = self.search_term();
    if !term.is_empty() {
      params.push(("what", term));
    }

    if let Some(job_type) = self.job_type_flag() {
      params.push((job_type.param(), "1".to_string()));
    }

    if let Some(min) = self.min_salary {
      params.push(("salary_min", min.to_string()));
    }

    params
  }
}

/// Number of pages for `count` results; never less than 1.
pub fn page_count(count: u64, page_size: u32) -> u32 {
  let page_size = u64::from(page_size.max(1));
  let pages = count.div_ceil(page_size).max(1);
  u32::try_from(pages).unwrap_or(u32::MAX)
}
