pub mod cli;
pub mod commands;
pub mod utils;

use clap::Parser;
use cli::Snipvault;
use commands::handle_command;
use snipvault_core::Notifier;
use snipvault_ui::ConsoleNotifier;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// Run the snipvault CLI application
pub fn run_main() {
    init_tracing();

    let args = Snipvault::parse();
    let mut notifier = ConsoleNotifier::new();
    let result = handle_command(args, &mut notifier);

    if let Err(e) = result {
        tracing::debug!("command failed: {:?}", e);
        notifier.error(&format!("Error: {}", e));
        process::exit(1);
    }
}

// Diagnostics go to stderr so stdout stays clean for `list`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
