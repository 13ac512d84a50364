use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::FetchError;

use super::api_types::{ApiHistoryResponse, ApiSearchResponse};
use super::filters::{SearchFilters, PAGE_SIZE};
use super::types::{JobPage, SalaryHistory};

/// Months of salary history requested per category
const HISTORY_MONTHS: u32 = 12;

/// Job search API client
#[derive(Clone)]
pub struct AdzunaClient {
  http: reqwest::Client,
  base_url: Url,
  country: String,
  app_id: String,
  app_key: String,
}

impl AdzunaClient {
  pub fn new(config: &Config) -> Result<Self> {
    let app_key = Config::get_app_key()?;
    Self::with_credentials(
      &config.adzuna.base_url,
      &config.adzuna.country,
      &config.adzuna.app_id,
      &app_key,
    )
  }

  pub fn with_credentials(base_url: &str, country: &str, app_id: &str, app_key: &str) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| eyre!("Invalid job API url {}: {}", base_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Job API url {} cannot be used as a base", base_url));
    }

    let http = reqwest::Client::builder()
      .user_agent(concat!("comfortzone/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      country: country.to_string(),
      app_id: app_id.to_string(),
      app_key: app_key.to_string(),
    })
  }

  /// Unfiltered first page of listings
  pub async fn home_listing(&self) -> Result<JobPage, FetchError> {
    let mut url = self.endpoint(&["search", "1"]);
    url
      .query_pairs_mut()
      .append_pair("results_per_page", &PAGE_SIZE.to_string());

    let response: ApiSearchResponse = self.get_json(url).await?;
    Ok(response.into())
  }

  /// Search with the given filters; the page goes in the path.
  pub async fn search(&self, filters: &SearchFilters) -> Result<JobPage, FetchError> {
    let page = filters.page.to_string();
    let mut url = self.endpoint(&["search", page.as_str()]);
    {
      let mut query = url.query_pairs_mut();
      for (name, value) in filters.query_params() {
        query.append_pair(name, &value);
      }
    }

    let response: ApiSearchResponse = self.get_json(url).await?;
    Ok(response.into())
  }

  /// Monthly average salary for a category over the last year
  pub async fn salary_history(&self, category: &str) -> Result<SalaryHistory, FetchError> {
    let mut url = self.endpoint(&["history"]);
    url
      .query_pairs_mut()
      .append_pair("category", category)
      .append_pair("months", &HISTORY_MONTHS.to_string());

    let response: ApiHistoryResponse = self.get_json(url).await?;
    Ok(response.into_history(category))
  }

  /// `{base}/jobs/{country}/{segments...}` with credentials attached
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path
        .pop_if_empty()
        .extend(["jobs", self.country.as_str()])
        .extend(segments);
    }
    url
      .query_pairs_mut()
      .append_pair("app_id", &self.app_id)
      .append_pair("app_key", &self.app_key)
      .append_pair("content-type", "application/json");
    url
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
    tracing::debug!(path = url.path(), "GET");

    let response = self.http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Network(format!("HTTP {}", status)));
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adzuna::filters::{ExperienceLevel, JobType};
  use wiremock::matchers::{method, path, query_param, query_param_is_missing};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client(server: &MockServer) -> AdzunaClient {
    AdzunaClient::with_credentials(&server.uri(), "us", "id-1", "key-1").unwrap()
  }

  #[tokio::test]
  async fn test_search_sends_translated_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/search/2"))
      .and(query_param("app_id", "id-1"))
      .and(query_param("app_key", "key-1"))
      .and(query_param("results_per_page", "30"))
      .and(query_param("what", "data analyst entry level"))
      .and(query_param("full_time", "1"))
      .and(query_param_is_missing("part_time"))
      .and(query_param("salary_min", "50000"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "results": [{"id": "9", "title": "Analyst"}],
        "count": 31
      })))
      .expect(1)
      .mount(&server)
      .await;

    let filters = SearchFilters {
      job_types: [JobType::FullTime, JobType::PartTime].into_iter().collect(),
      min_salary: Some(50_000),
      experience: Some(ExperienceLevel::Entry),
      ..SearchFilters::new("data analyst").with_page(2)
    };

    let page = client(&server).search(&filters).await.unwrap();
    assert_eq!(page.count, 31);
    assert_eq!(page.results[0].title(), "Analyst");
  }

  #[tokio::test]
  async fn test_home_listing_has_no_search_term() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/search/1"))
      .and(query_param_is_missing("what"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "results": [{"id": "1"}, {"id": "2"}]
      })))
      .mount(&server)
      .await;

    let page = client(&server).home_listing().await.unwrap();
    assert_eq!(page.results.len(), 2);
    // count missing upstream defaults to zero
    assert_eq!(page.count, 0);
  }

  #[tokio::test]
  async fn test_error_status_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let err = client(&server)
      .search(&SearchFilters::new("x"))
      .await
      .unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "{:?}", err);
  }

  #[tokio::test]
  async fn test_bad_body_is_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
      .mount(&server)
      .await;

    let err = client(&server).home_listing().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "{:?}", err);
  }

  #[tokio::test]
  async fn test_salary_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/history"))
      .and(query_param("category", "teaching-jobs"))
      .and(query_param("months", "12"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "month": {"2024-05": 41000, "2024-04": 40000}
      })))
      .mount(&server)
      .await;

    let history = client(&server)
      .salary_history("teaching-jobs")
      .await
      .unwrap();
    assert_eq!(history.category, "teaching-jobs");
    assert_eq!(history.points.len(), 2);
    assert_eq!(history.points[0].label(), "Apr 2024");
  }

  #[test]
  fn test_base_url_with_path_prefix() {
    let client =
      AdzunaClient::with_credentials("https://api.adzuna.com/v1/api/", "gb", "a", "b").unwrap();
    let url = client.endpoint(&["search", "3"]);
    assert_eq!(url.path(), "/v1/api/jobs/gb/search/3");
  }

  #[test]
  fn test_invalid_base_url() {
    assert!(AdzunaClient::with_credentials("not a url", "us", "a", "b").is_err());
  }
}
