mod command_input;
mod filter_panel;
mod input;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use filter_panel::{FilterPanel, FilterPanelEvent};
pub use search_input::{SearchEvent, SearchInput};

/// What a component did with a key.
///
/// Views offer each key to their overlays in turn and stop at the first one
/// that doesn't return `NotHandled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, and the parent has to act on this
  Event(T),
  /// Not consumed; try the next handler
  NotHandled,
}
