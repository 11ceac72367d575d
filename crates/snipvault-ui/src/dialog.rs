use crate::prompt::TerminalPrompt;
use snipvault_core::{FileDialog, FileFilter, PromptProvider, Result};
use std::path::{Path, PathBuf};

/// File "dialog" that asks for a path on a prompt and checks it against the
/// filters. Relative paths are resolved against `base_dir`.
#[derive(Debug)]
pub struct TerminalFileDialog<P = TerminalPrompt> {
    prompt: P,
    base_dir: PathBuf,
}

impl TerminalFileDialog<TerminalPrompt> {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_prompt(TerminalPrompt::new(), base_dir)
    }
}

impl<P: PromptProvider> TerminalFileDialog<P> {
    pub fn with_prompt(prompt: P, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompt,
            base_dir: base_dir.into(),
        }
    }

    fn ask_path(
        &mut self,
        label: &str,
        default: &str,
        check: impl Fn(&Path) -> std::result::Result<PathBuf, String>,
    ) -> Result<Option<PathBuf>> {
        let mut current_label = label.to_string();
        loop {
            let Some(answer) =
                self.prompt
                    .ask_text(&current_label, "e.g., ./snippets.json", default)?
            else {
                return Ok(None);
            };

            let answer = answer.trim();
            if answer.is_empty() {
                current_label = format!("A file path is required. {}", label);
                continue;
            }

            match check(&self.base_dir.join(answer)) {
                Ok(path) => return Ok(Some(path)),
                Err(reason) => current_label = format!("{} {}", reason, label),
            }
        }
    }
}

impl<P: PromptProvider> FileDialog for TerminalFileDialog<P> {
    fn open_file(&mut self, filters: &[FileFilter]) -> Result<Option<PathBuf>> {
        let label = format!("Select Snippet File ({})", describe(filters));
        self.ask_path(&label, "", |path| check_open_path(path, filters))
    }

    fn save_file(
        &mut self,
        filters: &[FileFilter],
        default_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let label = format!("Export Snippets to ({})", describe(filters));
        let default = default_path.display().to_string();
        self.ask_path(&label, &default, |path| Ok(with_default_extension(path, filters)))
    }
}

fn describe(filters: &[FileFilter]) -> String {
    if filters.is_empty() {
        return "any file".to_string();
    }
    filters
        .iter()
        .map(|filter| {
            let extensions: Vec<String> = filter
                .extensions
                .iter()
                .map(|ext| format!("*.{}", ext))
                .collect();
            format!("{}: {}", filter.name, extensions.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn check_open_path(
    path: &Path,
    filters: &[FileFilter],
) -> std::result::Result<PathBuf, String> {
    if !path.is_file() {
        return Err(format!("{} is not a file.", path.display()));
    }
    if !filters.is_empty() && !filters.iter().any(|filter| filter.matches(path)) {
        return Err(format!("{} has the wrong file type.", path.display()));
    }
    Ok(path.to_path_buf())
}

// Like a native save dialog: add the first allowed extension when none matches.
pub(crate) fn with_default_extension(path: &Path, filters: &[FileFilter]) -> PathBuf {
    if filters.is_empty() || filters.iter().any(|filter| filter.matches(path)) {
        return path.to_path_buf();
    }
    match filters.iter().find_map(|filter| filter.extensions.first()) {
        Some(ext) => {
            let mut name = path.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        }
        None => path.to_path_buf(),
    }
}
