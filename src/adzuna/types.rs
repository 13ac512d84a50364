use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A job listing as returned by the search API.
///
/// Only the fields we render are named; everything else is carried through in
/// `extra` untouched so a cached or selected listing round-trips intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
  #[serde(default, deserialize_with = "string_or_number")]
  pub id: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub company: Option<DisplayName>,
  #[serde(default)]
  pub location: Option<DisplayName>,
  #[serde(default)]
  pub salary_min: Option<f64>,
  #[serde(default)]
  pub salary_max: Option<f64>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub redirect_url: Option<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayName {
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobListing {
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("Untitled position")
  }

  pub fn company_name(&self) -> &str {
    self
      .company
      .as_ref()
      .and_then(|c| c.display_name.as_deref())
      .unwrap_or("Unknown company")
  }

  pub fn location_name(&self) -> &str {
    self
      .location
      .as_ref()
      .and_then(|l| l.display_name.as_deref())
      .unwrap_or("Unknown location")
  }

  pub fn description(&self) -> &str {
    self
      .description
      .as_deref()
      .filter(|d| !d.trim().is_empty())
      .unwrap_or("No description available.")
  }

  /// Salary range for display, e.g. "$50,000 - $70,000" or "Not Disclosed".
  pub fn salary_range(&self) -> String {
    let positive = |v: Option<f64>| v.filter(|v| *v > 0.0);
    match (positive(self.salary_min), positive(self.salary_max)) {
      (Some(min), Some(max)) => format!("{} - {}", format_dollars(min), format_dollars(max)),
      (Some(min), None) => format!("From {}", format_dollars(min)),
      (None, Some(max)) => format!("Up to {}", format_dollars(max)),
      (None, None) => "Not Disclosed".to_string(),
    }
  }
}

/// One page of search results. This is the cached payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPage {
  pub results: Vec<JobListing>,
  pub count: u64,
}

/// Average advertised salary for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryPoint {
  /// First day of the month
  pub month: NaiveDate,
  pub salary: f64,
}

impl SalaryPoint {
  /// "Jan 2024"
  pub fn label(&self) -> String {
    self.month.format("%b %Y").to_string()
  }
}

/// Salary history for a category, oldest month first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryHistory {
  pub category: String,
  pub points: Vec<SalaryPoint>,
}

impl SalaryHistory {
  pub fn most_recent_first(&self) -> impl Iterator<Item = &SalaryPoint> {
    self.points.iter().rev()
  }
}

/// A selectable job category for salary history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
  pub label: &'static str,
  pub tag: &'static str,
}

pub const CATEGORIES: &[Category] = &[
  Category {
    label: "IT Jobs",
    tag: "it-jobs",
  },
  Category {
    label: "Accounting & Finance Jobs",
    tag: "accounting-finance-jobs",
  },
  Category {
    label: "Engineering Jobs",
    tag: "engineering-jobs",
  },
  Category {
    label: "Healthcare & Nursing Jobs",
    tag: "healthcare-nursing-jobs",
  },
  Category {
    label: "Teaching Jobs",
    tag: "teaching-jobs",
  },
  Category {
    label: "Hospitality & Catering Jobs",
    tag: "hospitality-catering-jobs",
  },
  Category {
    label: "Logistics & Warehouse Jobs",
    tag: "logistics-warehouse-jobs",
  },
  Category {
    label: "Retail Jobs",
    tag: "retail-jobs",
  },
];

/// Whole dollars with thousands separators: 54321.4 -> "$54,321".
pub fn format_dollars(amount: f64) -> String {
  let whole = amount.round().abs() as u64;
  let digits = whole.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  if amount < 0.0 && whole > 0 {
    format!("-${}", out)
  } else {
    format!("${}", out)
  }
}

/// Listing ids come back as strings from the API but older cached payloads
/// and some mirrors use numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
  Ok(match value {
    Some(serde_json::Value::String(s)) => Some(s),
    Some(serde_json::Value::Number(n)) => Some(n.to_string()),
    _ => None,
  })
}
