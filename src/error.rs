//! Error taxonomy for the fetch pipeline.
//!
//! Plumbing (config, storage, terminal) uses `color_eyre::Result`. Anything a
//! view can end up displaying goes through `FetchError` so the view can pick a
//! fixed user-facing message while the detail goes to the log.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  /// Transport failure or non-success HTTP status
  #[error("network request failed: {0}")]
  Network(String),

  /// Response body did not have the expected shape
  #[error("unexpected response: {0}")]
  Parse(String),

  /// Detail view opened without a prior selection
  #[error("no job details found")]
  MissingSelection,
}

impl FetchError {
  pub fn network(err: impl std::fmt::Display) -> Self {
    Self::Network(err.to_string())
  }

  pub fn parse(err: impl std::fmt::Display) -> Self {
    Self::Parse(err.to_string())
  }

  /// Message shown in place of the results.
  ///
  /// Parse failures read the same as network failures to the user.
  pub fn user_message(&self, what: &str) -> String {
    match self {
      Self::Network(_) | Self::Parse(_) => {
        format!("Failed to fetch {}. Please try again later.", what)
      }
      Self::MissingSelection => "No job details found".to_string(),
    }
  }
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    Self::network(err)
  }
}

impl From<serde_json::Error> for FetchError {
  fn from(err: serde_json::Error) -> Self {
    Self::parse(err)
  }
}
