use chrono::{DateTime, Utc};
use ratatui::prelude::Color;

use crate::cache::{CacheResult, CacheSource};

/// Truncate a string to at most `max_len` chars, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// "cached 5m ago" / "live", shown next to result counts
pub fn source_label<T>(result: &CacheResult<T>, now: DateTime<Utc>) -> String {
  match (result.source, result.cached_at) {
    (CacheSource::Cache, Some(at)) => format!("cached {} ago", age(now - at)),
    (CacheSource::Cache, None) => "cached".to_string(),
    (CacheSource::Network, _) => "live".to_string(),
  }
}

pub fn source_color(source: CacheSource) -> Color {
  match source {
    CacheSource::Cache => Color::Magenta,
    CacheSource::Network => Color::Green,
  }
}

fn age(elapsed: chrono::Duration) -> String {
  let secs = elapsed.num_seconds().max(0);
  match secs {
    0..=59 => format!("{}s", secs),
    60..=3599 => format!("{}m", secs / 60),
    3600..=86399 => format!("{}h", secs / 3600),
    _ => format!("{}d", secs / 86400),
  }
}

/// Strip HTML tags and collapse whitespace; upstream descriptions sometimes
/// carry markup.
pub fn plain_text(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut in_tag = false;
  for c in s.chars() {
    match c {
      '<' => in_tag = true,
      '>' if in_tag => {
        in_tag = false;
        out.push(' ');
      }
      _ if !in_tag => out.push(c),
      _ => {}
    }
  }
  out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Crème brûlée chef", 8), "Crème...");
  }

  #[test]
  fn test_source_label() {
    let now = Utc::now();
    let cached = CacheResult::from_cache(1, now - Duration::minutes(5));
    assert_eq!(source_label(&cached, now), "cached 5m ago");

    let cached = CacheResult::from_cache(1, now - Duration::hours(3));
    assert_eq!(source_label(&cached, now), "cached 3h ago");

    assert_eq!(source_label(&CacheResult::from_network(1), now), "live");
  }

  #[test]
  fn test_plain_text() {
    assert_eq!(
      plain_text("<strong>Great</strong> team,\n\n  good <em>pay</em>"),
      "Great team, good pay"
    );
  }
}
