use super::KeyResult;
use crate::adzuna::filters::{ExperienceLevel, JobType, SearchFilters, SALARY_FLOORS};
use crate::adzuna::types::format_dollars;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Events emitted by the filter panel that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPanelEvent {
  /// Enter pressed: use these filters
  Applied(SearchFilters),
  Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
  JobType(JobType),
  MinSalary,
  Experience,
}

const ROWS: [Row; 4] = [
  Row::JobType(JobType::FullTime),
  Row::JobType(JobType::PartTime),
  Row::MinSalary,
  Row::Experience,
];

/// Overlay for editing job type, salary floor and experience level.
///
/// Edits a draft; nothing reaches the caller until Enter.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
  active: bool,
  draft: SearchFilters,
  selected: usize,
}

impl FilterPanel {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Open the panel on a copy of `filters`
  pub fn show(&mut self, filters: SearchFilters) {
    self.active = true;
    self.draft = filters;
    self.selected = 0;
  }

  pub fn hide(&mut self) {
    self.active = false;
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterPanelEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.hide();
        KeyResult::Event(FilterPanelEvent::Cancelled)
      }
      KeyCode::Enter => {
        self.hide();
        KeyResult::Event(FilterPanelEvent::Applied(self.draft.clone()))
      }
      KeyCode::Char('j') | KeyCode::Down => {
        self.selected = (self.selected + 1) % ROWS.len();
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.selected = (self.selected + ROWS.len() - 1) % ROWS.len();
        KeyResult::Handled
      }
      KeyCode::Char(' ') | KeyCode::Right | KeyCode::Char('l') => {
        self.cycle(true);
        KeyResult::Handled
      }
      KeyCode::Left | KeyCode::Char('h') => {
        self.cycle(false);
        KeyResult::Handled
      }
      KeyCode::Char('c') => {
        self.draft = SearchFilters::new(self.draft.query.clone());
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  fn cycle(&mut self, forward: bool) {
    match ROWS[self.selected] {
      Row::JobType(job_type) => self.draft.toggle_job_type(job_type),
      Row::MinSalary => {
        let options: Vec<Option<u32>> = std::iter::once(None)
          .chain(SALARY_FLOORS.iter().copied().map(Some))
          .collect();
        self.draft.min_salary = step(&options, &self.draft.min_salary, forward);
      }
      Row::Experience => {
        let options: Vec<Option<ExperienceLevel>> = std::iter::once(None)
          .chain(ExperienceLevel::ALL.into_iter().map(Some))
          .collect();
        self.draft.experience = step(&options, &self.draft.experience, forward);
      }
    }
  }

  fn row_label(&self, row: Row) -> String {
    match row {
      Row::JobType(job_type) => {
        let mark = if self.draft.job_types.contains(&job_type) {
          "[x]"
        } else {
          "[ ]"
        };
        format!("{} {}", mark, job_type.label())
      }
      Row::MinSalary => {
        let value = self
          .draft
          .min_salary
          .map(|s| format!("{}+", format_dollars(f64::from(s))))
          .unwrap_or_else(|| "Any".to_string());
        format!("Min salary   < {} >", value)
      }
      Row::Experience => {
        let value = self.draft.experience.map_or("Any", |e| e.label());
        format!("Experience   < {} >", value)
      }
    }
  }

  /// Render the panel overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = 36u16.min(area.width);
    let height = (ROWS.len() as u16 + 3).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Filters ")
      .title_bottom(Line::from(" space:toggle  c:clear  enter:apply ").centered());

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let items: Vec<ListItem> = ROWS
      .iter()
      .map(|row| ListItem::new(Span::styled(self.row_label(*row), Style::default().fg(Color::Cyan))))
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}

/// Next (or previous) option after `current`, wrapping around.
fn step<T: PartialEq + Copy>(options: &[T], current: &T, forward: bool) -> T {
  let len = options.len();
  let idx = options.iter().position(|o| o == current).unwrap_or(0);
  let next = if forward {
    (idx + 1) % len
  } else {
    (idx + len - 1) % len
  };
  options[next]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn applied(panel: &mut FilterPanel) -> SearchFilters {
    match panel.handle_key(key(KeyCode::Enter)) {
      KeyResult::Event(FilterPanelEvent::Applied(filters)) => filters,
      other => panic!("expected Applied, got {:?}", other),
    }
  }

  #[test]
  fn test_inactive_passes_keys_through() {
    let mut panel = FilterPanel::new();
    assert_eq!(panel.handle_key(key(KeyCode::Char('j'))), KeyResult::NotHandled);
  }

  #[test]
  fn test_toggle_both_job_types() {
    let mut panel = FilterPanel::new();
    panel.show(SearchFilters::new("cook"));
    panel.handle_key(key(KeyCode::Char(' ')));
    panel.handle_key(key(KeyCode::Down));
    panel.handle_key(key(KeyCode::Char(' ')));

    let filters = applied(&mut panel);
    assert_eq!(filters.query, "cook");
    assert_eq!(filters.job_types.len(), 2);
    assert_eq!(filters.job_type_flag(), Some(JobType::FullTime));
  }

  #[test]
  fn test_salary_cycles_through_floors() {
    let mut panel = FilterPanel::new();
    panel.show(SearchFilters::default());
    panel.handle_key(key(KeyCode::Char('k'))); // wrap to Experience
    panel.handle_key(key(KeyCode::Char('k'))); // Min salary

    panel.handle_key(key(KeyCode::Right));
    assert_eq!(panel.draft.min_salary, Some(50_000));
    panel.handle_key(key(KeyCode::Right));
    assert_eq!(panel.draft.min_salary, Some(100_000));
    panel.handle_key(key(KeyCode::Right));
    assert_eq!(panel.draft.min_salary, None);
    panel.handle_key(key(KeyCode::Left));
    assert_eq!(panel.draft.min_salary, Some(100_000));
  }

  #[test]
  fn test_experience_and_clear() {
    let mut panel = FilterPanel::new();
    panel.show(SearchFilters::new("x"));
    panel.handle_key(key(KeyCode::Up)); // Experience
    panel.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(panel.draft.experience, Some(ExperienceLevel::Entry));
    assert_eq!(panel.row_label(Row::Experience), "Experience   < Entry Level >");

    panel.handle_key(key(KeyCode::Char('c')));
    let filters = applied(&mut panel);
    assert!(filters.is_unfiltered());
    assert_eq!(filters.query, "x");
  }

  #[test]
  fn test_cancel_discards_draft() {
    let mut panel = FilterPanel::new();
    panel.show(SearchFilters::default());
    panel.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(
      panel.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(FilterPanelEvent::Cancelled)
    );
    assert!(!panel.is_active());
  }
}
