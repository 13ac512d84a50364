use crate::adzuna::cached_client::CachedAdzunaClient;
use crate::adzuna::types::{format_dollars, Category, SalaryHistory, CATEGORIES};
use crate::query::{Query, QueryState};
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, Paragraph};

const FETCH_ERROR: &str = "Error fetching salary data.";

/// Average advertised salary per month for one category
pub struct SalaryView {
  jobs: CachedAdzunaClient,
  category: usize,
  query: Query<SalaryHistory>,
}

impl SalaryView {
  pub fn new(jobs: CachedAdzunaClient) -> Self {
    let mut query = Query::new(fetcher(jobs.clone(), CATEGORIES[0]));
    query.fetch();
    Self {
      jobs,
      category: 0,
      query,
    }
  }

  fn category(&self) -> Category {
    CATEGORIES[self.category]
  }

  fn select_category(&mut self, index: usize) {
    self.category = index % CATEGORIES.len();
    self
      .query
      .set_fetcher(fetcher(self.jobs.clone(), self.category()));
    self.query.refetch();
  }

  fn render_chart(&self, history: &SalaryHistory, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" Trend ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let bars: Vec<Bar> = history
      .points
      .iter()
      .map(|point| {
        Bar::default()
          .value(point.salary.max(0.0).round() as u64)
          .label(Line::from(point.month.format("%b").to_string()))
          .text_value(format!("{:.0}k", point.salary / 1000.0))
      })
      .collect();

    let count = bars.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).clamp(3, 9);

    let chart = BarChart::default()
      .block(block)
      .data(BarGroup::default().bars(&bars))
      .bar_width(bar_width)
      .bar_gap(1)
      .bar_style(Style::default().fg(Color::Cyan))
      .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(chart, area);
  }

  fn render_table(&self, history: &SalaryHistory, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = history
      .most_recent_first()
      .map(|point| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<10}", point.label()), Style::default().fg(Color::DarkGray)),
          Span::styled(format_dollars(point.salary), Style::default().fg(Color::Green)),
        ]))
      })
      .collect();

    let list = List::new(items).block(
      Block::default()
        .title(" By month ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(list, area);
  }
}

impl View for SalaryView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
        self.select_category(self.category + 1);
      }
      KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
        self.select_category(self.category + CATEGORIES.len() - 1);
      }
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", self.category().label),
      _ => format!(" {} ", self.category().label),
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(error) = self.query.error() {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let Some(history) = self.query.data() else {
      let paragraph =
        Paragraph::new("Loading salary history...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    };

    if history.points.is_empty() {
      let paragraph = Paragraph::new("No salary data for this category.")
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Min(30), Constraint::Length(24)])
      .split(inner);

    self.render_chart(history, frame, chunks[0]);
    self.render_table(history, frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    "Salaries".to_string()
  }

  fn context(&self) -> Option<String> {
    Some(self.category().label.to_string())
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("h/l", "category").with_priority(20),
      Shortcut::new("r", "refresh").with_priority(50),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}

fn fetcher(
  jobs: CachedAdzunaClient,
  category: Category,
) -> impl Fn() -> futures::future::BoxFuture<'static, Result<SalaryHistory, String>>
     + Send
     + Sync
     + 'static {
  move || {
    let jobs = jobs.clone();
    Box::pin(async move {
      jobs.salary_history(category.tag).await.map_err(|e| {
        tracing::warn!(error = %e, category = category.tag, "failed to fetch salary history");
        FETCH_ERROR.to_string()
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adzuna::client::AdzunaClient;
  use crate::cache::{CacheLayer, CacheStore, MemoryStorage};
  use std::sync::Arc;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn jobs(server: &MockServer) -> CachedAdzunaClient {
    let inner = AdzunaClient::with_credentials(&server.uri(), "us", "id", "key").unwrap();
    let store = CacheStore::new(Arc::new(MemoryStorage::new()));
    CachedAdzunaClient::new(inner, CacheLayer::new(store), chrono::Duration::hours(1))
  }

  #[tokio::test]
  async fn test_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/history"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let fetch = fetcher(jobs(&server), CATEGORIES[0]);
    assert_eq!(fetch().await.unwrap_err(), "Error fetching salary data.");
  }

  #[tokio::test]
  async fn test_fetches_selected_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/jobs/us/history"))
      .and(wiremock::matchers::query_param("category", "teaching-jobs"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "month": {"2024-01": 40000}
      })))
      .mount(&server)
      .await;

    let teaching = CATEGORIES.iter().copied().find(|c| c.tag == "teaching-jobs").unwrap();
    let history = fetcher(jobs(&server), teaching)().await.unwrap();
    assert_eq!(history.points.len(), 1);
  }
}
