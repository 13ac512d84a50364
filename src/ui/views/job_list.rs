use crate::adzuna::session::SearchSession;
use crate::adzuna::types::{format_dollars, JobListing};
use crate::app::AppContext;
use crate::cache::QueryKey;
use crate::query::QueryState;
use crate::ui::components::{
  FilterPanel, FilterPanelEvent, KeyResult, SearchEvent, SearchInput,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{source_color, source_label, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::JobDetailView;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Home listing and search results
pub struct JobListView {
  ctx: AppContext,
  session: SearchSession,
  list_state: ListState,
  search: SearchInput,
  filters: FilterPanel,
}

impl JobListView {
  pub fn new(ctx: AppContext) -> Self {
    let mut session = SearchSession::new(ctx.jobs.clone());
    session.start();
    Self::with_session(ctx, session)
  }

  /// Open directly on a search for `text`
  pub fn with_search(ctx: AppContext, text: &str) -> Self {
    let session = SearchSession::with_query(ctx.jobs.clone(), text);
    Self::with_session(ctx, session)
  }

  fn with_session(ctx: AppContext, session: SearchSession) -> Self {
    Self {
      ctx,
      session,
      list_state: ListState::default(),
      search: SearchInput::new(),
      filters: FilterPanel::new(),
    }
  }

  fn jobs(&self) -> &[JobListing] {
    self
      .session
      .state()
      .data()
      .map(|r| r.data.results.as_slice())
      .unwrap_or(&[])
  }

  fn selected_job(&self) -> Option<&JobListing> {
    self.list_state.selected().and_then(|i| self.jobs().get(i))
  }

  fn open_selected(&self) -> ViewAction {
    let Some(job) = self.selected_job() else {
      return ViewAction::None;
    };
    if let Err(e) = self.ctx.handoff.select(job) {
      tracing::warn!(error = %e, "failed to store selected job");
    }
    ViewAction::Push(Box::new(JobDetailView::new(&self.ctx.handoff)))
  }

  fn title(&self) -> String {
    let what = match self.session.filters() {
      None => "Latest jobs".to_string(),
      Some(f) if f.query.is_empty() => "Filtered jobs".to_string(),
      Some(f) => format!("Jobs for '{}'", truncate(&f.query, 30)),
    };
    let page = format!(
      "page {}/{}",
      self.session.current_page(),
      self.session.page_count()
    );

    match self.session.state() {
      QueryState::Loading => format!(" {} ({}, loading...) ", what, page),
      QueryState::Success(result) => {
        format!(" {} ({} total, {}) ", what, result.data.count, page)
      }
      _ => format!(" {} ({}) ", what, page),
    }
  }

  fn render_filter_summary(&self, frame: &mut Frame, area: Rect) {
    let mut parts: Vec<String> = Vec::new();
    if let Some(filters) = self.session.filters() {
      if let Some(job_type) = filters.job_type_flag() {
        parts.push(job_type.label().to_string());
      }
      if let Some(min) = filters.min_salary {
        parts.push(format!("{}+", format_dollars(f64::from(min))));
      }
      if let Some(level) = filters.experience {
        parts.push(level.label().to_string());
      }
    }

    let mut spans = vec![Span::styled(" Filters: ", Style::default().fg(Color::DarkGray))];
    if parts.is_empty() {
      spans.push(Span::styled("none", Style::default().fg(Color::DarkGray)));
    } else {
      spans.push(Span::styled(parts.join(" · "), Style::default().fg(Color::Yellow)));
    }

    if let QueryState::Success(result) = self.session.state() {
      spans.push(Span::raw("   "));
      spans.push(Span::styled(
        source_label(result, Utc::now()),
        Style::default().fg(source_color(result.source)),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.jobs().len();
    ensure_valid_selection(&mut self.list_state, len);

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(error) = self.session.state().error() {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", error))
        .block(block)
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
      return;
    }

    if len == 0 {
      let content = if self.session.state().is_loading() {
        "Loading jobs..."
      } else {
        "No jobs found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .jobs()
      .iter()
      .map(|job| {
        ListItem::new(Line::from(vec![
          Span::raw(format!("{:<42}", truncate(job.title(), 40))),
          Span::styled(
            format!("{:<26}", truncate(job.company_name(), 24)),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(
            format!("{:<24}", truncate(job.location_name(), 22)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::styled(job.salary_range(), Style::default().fg(Color::Green)),
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
}

impl View for JobListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Overlays first
    match self.filters.handle_key(key) {
      KeyResult::Event(FilterPanelEvent::Applied(filters)) => {
        self.session.apply_filters(filters);
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(FilterPanelEvent::Cancelled) | KeyResult::Handled => {
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    if !self.search.is_active() && key.code == KeyCode::Char('/') {
      let current = self
        .session
        .filters()
        .map(|f| f.query.clone())
        .unwrap_or_default();
      self.search.activate(&current);
      return ViewAction::None;
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(text)) => {
        self.session.submit(&text);
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cancelled) | KeyResult::Handled => {
        return ViewAction::None;
      }
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('n') | KeyCode::Right => {
        if self.session.next_page() {
          self.list_state.select(Some(0));
        }
      }
      KeyCode::Char('p') | KeyCode::Left => {
        if self.session.prev_page() {
          self.list_state.select(Some(0));
        }
      }
      KeyCode::Char('f') => {
        let current = self.session.filters().cloned().unwrap_or_default();
        self.filters.show(current);
      }
      KeyCode::Char('r') => self.session.refresh(),
      KeyCode::Enter => return self.open_selected(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(1)])
      .split(area);

    self.render_filter_summary(frame, chunks[0]);
    self.render_list(frame, chunks[1]);

    self.search.render_overlay(frame, area);
    self.filters.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Jobs".to_string()
  }

  fn context(&self) -> Option<String> {
    Some(self.session.key().description())
  }

  fn is_capturing_input(&self) -> bool {
    self.search.is_active() || self.filters.is_active()
  }

  fn tick(&mut self) {
    self.session.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command").with_priority(10),
      Shortcut::new("/", "search").with_priority(20),
      Shortcut::new("f", "filters").with_priority(30),
      Shortcut::new("n/p", "page").with_priority(40),
      Shortcut::new("r", "refresh").with_priority(50),
      Shortcut::new("q", "quit").with_priority(90),
    ]
  }
}
