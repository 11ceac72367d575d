//! snipvault-core - per-language snippet collections with a markdown log.
//!
//! Snippets live in one JSON file per language. Each project keeps a
//! `SavedSnippets.md` mirror that gains a block when a snippet is saved and
//! loses it when the snippet is deleted.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod interaction;
pub mod manager;
pub mod models;
pub mod snippet_log;
pub mod storage;
pub mod workflow;

// Re-export common items for convenience
pub use clipboard::get_clipboard_text;
pub use config::{SnipvaultConfig, LOG_FILENAME};
pub use error::{Result, SnipvaultError};
pub use interaction::{
    ActiveContext, FileDialog, FileFilter, Notifier, Picker, PromptProvider, RecordingNotifier,
    TracingNotifier,
};
pub use manager::{read_import_file, Library, SnippetManager};
pub use models::{Collection, Snippet};
pub use snippet_log::SnippetLog;
pub use storage::SnippetStore;
pub use workflow::{
    DeleteWorkflow, ExportWorkflow, ImportWorkflow, NewSnippetWorkflow, WorkflowOutcome,
};
