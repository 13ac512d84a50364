use crate::adzuna::types::JobListing;
use crate::error::FetchError;
use crate::handoff::SelectedJobHandoff;
use crate::ui::renderfns::{plain_text, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Details of the job picked in the list
pub struct JobDetailView {
  job: Result<JobListing, FetchError>,
  scroll: u16,
}

impl JobDetailView {
  /// Reads the selection once, on open
  pub fn new(handoff: &SelectedJobHandoff) -> Self {
    Self {
      job: handoff.consume(),
      scroll: 0,
    }
  }

  fn render_job(&self, job: &JobListing, frame: &mut Frame, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
      Line::from(Span::styled(job.title(), Style::default().bold())),
      Line::from(""),
      Line::from(vec![
        Span::styled("Company:  ", label),
        Span::styled(job.company_name(), Style::default().fg(Color::Cyan)),
      ]),
      Line::from(vec![
        Span::styled("Location: ", label),
        Span::raw(job.location_name()),
      ]),
      Line::from(vec![
        Span::styled("Salary:   ", label),
        Span::styled(job.salary_range(), Style::default().fg(Color::Green)),
      ]),
    ];
    if let Some(url) = &job.redirect_url {
      lines.push(Line::from(vec![
        Span::styled("Apply:    ", label),
        Span::styled(url.as_str(), Style::default().fg(Color::Blue).underlined()),
      ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(plain_text(job.description())));

    let paragraph = Paragraph::new(lines)
      .wrap(Wrap { trim: true })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }
}

impl View for JobDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
        ViewAction::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        ViewAction::None
      }
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" Job details ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &self.job {
      Ok(job) => self.render_job(job, frame, inner),
      Err(e) => {
        let paragraph =
          Paragraph::new(e.user_message("job details")).style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, inner);
      }
    }
  }

  fn breadcrumb_label(&self) -> String {
    match &self.job {
      Ok(job) => truncate(job.title(), 40),
      Err(_) => "Details".to_string(),
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new("j/k", "scroll"), Shortcut::new("q", "back")]
  }
}
