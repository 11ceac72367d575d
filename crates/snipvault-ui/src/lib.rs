//! Terminal implementations of the snipvault collaborators.

mod common;
mod dialog;
mod notifier;
mod picker;
mod prompt;

// Public API
pub use dialog::TerminalFileDialog;
pub use notifier::ConsoleNotifier;
pub use picker::TerminalPicker;
pub use prompt::TerminalPrompt;
