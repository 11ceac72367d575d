//! Collaborators the workflows talk to: prompts, pickers, file dialogs and
//! notifications. Frontends implement these; the core never touches a
//! terminal directly.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// What the user is working on when a command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveContext {
    pub selected_text: Option<String>,
    pub language_id: Option<String>,
    /// Root of the current project; the markdown log is skipped without one.
    pub project_root: Option<PathBuf>,
}

impl ActiveContext {
    /// Selected text, treating an empty selection as none.
    pub fn selection(&self) -> Option<&str> {
        self.selected_text.as_deref().filter(|text| !text.is_empty())
    }

    pub fn language(&self) -> Option<&str> {
        self.language_id
            .as_deref()
            .filter(|language| !language.trim().is_empty())
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}

/// Asks for a single line of text. `None` means the user abandoned the prompt.
pub trait PromptProvider {
    fn ask_text(&mut self, label: &str, placeholder: &str, default: &str)
        -> Result<Option<String>>;
}

/// Lets the user choose one entry. `None` means nothing was chosen.
pub trait Picker {
    fn pick_one(&mut self, options: &[String], label: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn json() -> Self {
        Self {
            name: "JSON".to_string(),
            extensions: vec!["json".to_string()],
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

pub trait FileDialog {
    fn open_file(&mut self, filters: &[FileFilter]) -> Result<Option<PathBuf>>;
    fn save_file(&mut self, filters: &[FileFilter], default_path: &Path)
        -> Result<Option<PathBuf>>;
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Notifier that only forwards to `tracing`, for non-interactive callers.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn info(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Notifier that keeps every message in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingNotifier {
    pub infos: Vec<String>,
    pub warns: Vec<String>,
    pub errors: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warns.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
