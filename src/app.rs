use crate::adzuna::cached_client::CachedAdzunaClient;
use crate::event::{Event, EventHandler};
use crate::handoff::SelectedJobHandoff;
use crate::places::PlacesClient;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{HousingView, JobListView, SalaryView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;

/// Clients and shared state handed to views
#[derive(Clone)]
pub struct AppContext {
  pub jobs: CachedAdzunaClient,
  pub places: PlacesClient,
  pub handoff: SelectedJobHandoff,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` command palette
  command: CommandInput,

  ctx: AppContext,

  /// Header title
  title: String,

  /// Right side of the footer (cache mode)
  status: String,

  should_quit: bool,
}

impl App {
  pub fn new(ctx: AppContext, title: String, status: String, initial_query: Option<&str>) -> Self {
    let root: Box<dyn View> = match initial_query {
      Some(text) => Box::new(JobListView::with_search(ctx.clone(), text)),
      None => Box::new(JobListView::new(ctx.clone())),
    };

    Self {
      view_stack: vec![root],
      command: CommandInput::new(),
      ctx,
      title,
      status,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.event_loop().await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(100));

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {}
      Event::Tick => {
        for view in &mut self.view_stack {
          view.tick();
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let capturing = self
      .view_stack
      .last()
      .is_some_and(|view| view.is_capturing_input());

    if !capturing {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    let Some(view) = self.view_stack.last_mut() else {
      self.should_quit = true;
      return;
    };

    match view.handle_key(key) {
      ViewAction::None => {}
      ViewAction::Push(next) => self.view_stack.push(next),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  /// Replace the root view (or quit)
  fn execute_command(&mut self, cmd: &str) {
    let root: Box<dyn View> = match cmd {
      "jobs" => Box::new(JobListView::new(self.ctx.clone())),
      "salary" => Box::new(SalaryView::new(self.ctx.jobs.clone())),
      "housing" => Box::new(HousingView::new(self.ctx.places.clone())),
      "quit" => {
        self.should_quit = true;
        return;
      }
      other => {
        tracing::debug!(command = other, "unknown command");
        return;
      }
    };

    self.view_stack.clear();
    self.view_stack.push(root);
  }

  // Accessors for UI rendering
  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn status_line(&self) -> String {
    self.status.clone()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
