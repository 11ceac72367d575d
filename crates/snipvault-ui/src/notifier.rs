use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use snipvault_core::Notifier;
use std::io::{self, Write};

/// Prints notifications as colored lines on stderr. They are mirrored to
/// `tracing` at debug level so `RUST_LOG=debug` shows them in order with
/// the rest of the trace.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    fn print(&self, symbol: &str, color: Color, message: &str) {
        let mut stderr = io::stderr();
        // Notifications are fire-and-forget; a closed stderr is not an error.
        let _ = execute!(
            stderr,
            SetForegroundColor(color),
            Print(symbol),
            ResetColor,
            Print(" "),
            Print(message),
            Print("\n")
        );
        let _ = stderr.flush();
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&mut self, message: &str) {
        tracing::debug!(kind = "info", "{}", message);
        self.print("✓", Color::Green, message);
    }

    fn warn(&mut self, message: &str) {
        tracing::debug!(kind = "warn", "{}", message);
        self.print("!", Color::Yellow, message);
    }

    fn error(&mut self, message: &str) {
        tracing::debug!(kind = "error", "{}", message);
        self.print("✗", Color::Red, message);
    }
}
