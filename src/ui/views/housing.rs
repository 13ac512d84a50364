use crate::places::{HousingResults, Place, PlacesClient};
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Short-term housing around a typed location
pub struct HousingView {
  places: PlacesClient,
  location: String,
  query: Query<HousingResults>,
  list_state: ListState,
  prompt: SearchInput,
}

impl HousingView {
  pub fn new(places: PlacesClient) -> Self {
    let mut prompt = SearchInput::with_title("Location");
    prompt.activate("");
    Self {
      places,
      location: String::new(),
      query: Query::new(|| async { Ok(HousingResults::default()) }),
      list_state: ListState::default(),
      prompt,
    }
  }

  fn lookup(&mut self, location: &str) {
    let location = location.trim().to_string();
    if location.is_empty() {
      return;
    }

    let places = self.places.clone();
    let text = location.clone();
    self.query.set_fetcher(move || {
      let places = places.clone();
      let text = text.clone();
      async move {
        places.lookup(&text).await.map_err(|e| {
          tracing::warn!(error = %e, location = %text, "housing lookup failed");
          e.user_message("housing")
        })
      }
    });
    self.location = location;
    self.list_state.select(Some(0));
    self.query.refetch();
  }

  fn places(&self) -> &[Place] {
    self
      .query
      .data()
      .map(|r| r.places.as_slice())
      .unwrap_or(&[])
  }

  fn message(&self) -> Option<String> {
    match self.query.state() {
      QueryState::Idle => Some("Press / to enter a city or address.".to_string()),
      QueryState::Loading => Some(format!("Looking up {}...", self.location)),
      QueryState::Error(e) => Some(format!("{}\n\nPress 'r' to retry.", e)),
      QueryState::Success(results) if results.center.is_none() => {
        Some(format!("Location '{}' not found.", results.location))
      }
      QueryState::Success(results) if results.places.is_empty() => {
        Some(format!("No short-term housing found near {}.", results.location))
      }
      QueryState::Success(_) => None,
    }
  }
}

impl View for HousingView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if !self.prompt.is_active() && key.code == KeyCode::Char('/') {
      let current = self.location.clone();
      self.prompt.activate(&current);
      return ViewAction::None;
    }

    match self.prompt.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(text)) => {
        self.lookup(&text);
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') if !self.location.is_empty() => self.query.refetch(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = if self.location.is_empty() {
      " Housing ".to_string()
    } else {
      format!(" Housing near {} ({}) ", truncate(&self.location, 30), self.places().len())
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(message) = self.message() {
      let color = if self.query.is_error() {
        Color::Red
      } else {
        Color::DarkGray
      };
      let paragraph = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
    } else {
      let len = self.places().len();
      ensure_valid_selection(&mut self.list_state, len);

      let items: Vec<ListItem> = self
        .places()
        .iter()
        .map(|place| {
          ListItem::new(Line::from(vec![
            Span::styled(
              format!("{:>7.1} km  ", place.distance_km),
              Style::default().fg(Color::Yellow),
            ),
            Span::raw(format!("{:<36}", truncate(&place.name, 34))),
            Span::styled(
              format!("{:<13}", truncate(&place.kind, 12)),
              Style::default().fg(Color::Cyan),
            ),
            Span::styled(place.address.clone(), Style::default().fg(Color::DarkGray)),
          ]))
        })
        .collect();

      let list = List::new(items)
        .block(block)
        .highlight_style(
          Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
      frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    self.prompt.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Housing".to_string()
  }

  fn context(&self) -> Option<String> {
    (!self.location.is_empty()).then(|| self.location.clone())
  }

  fn is_capturing_input(&self) -> bool {
    self.prompt.is_active()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("/", "location").with_priority(20),
      Shortcut::new("r", "refresh").with_priority(50),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}
