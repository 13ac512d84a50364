pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function: header, current view, command overlay, footer
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let breadcrumb = app.breadcrumb();
  let status = app.status_line();
  let title = app.title().to_string();

  if let Some(view) = app.current_view_mut() {
    let context = view.context();
    renderfns::draw_header(
      frame,
      chunks[0],
      &title,
      context.as_deref(),
      &view.shortcuts(),
    );
    view.render(frame, chunks[1]);
  }

  app.command_input().render_overlay(frame, chunks[1]);
  renderfns::draw_footer(frame, chunks[2], &breadcrumb, &status);
}

/// Keep the list selection inside `0..len`, selecting the first row when
/// rows appear and clearing it when they go away.
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
