use crate::error::{Result, SnipvaultError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOG_FILENAME: &str = "SavedSnippets.md";
pub const EXPORT_FILENAME: &str = "exported-snippets.json";
pub const NO_DESCRIPTION: &str = "No description";
pub const SNIPPETS_DIR_ENV: &str = "SNIPVAULT_SNIPPETS_DIR";

/// Startup configuration, resolved once and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnipvaultConfig {
    /// Directory holding one `<languageId>.json` collection per language.
    pub snippets_dir: PathBuf,
}

impl SnipvaultConfig {
    pub fn new(snippets_dir: impl Into<PathBuf>) -> Self {
        Self {
            snippets_dir: snippets_dir.into(),
        }
    }

    /// Resolve the configuration from the environment.
    ///
    /// `SNIPVAULT_SNIPPETS_DIR` wins; otherwise the editor's user snippet
    /// directory for the current platform is used.
    pub fn from_env() -> Self {
        let snippets_dir = env::var_os(SNIPPETS_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_snippets_dir);

        tracing::debug!("Using snippets directory {}", snippets_dir.display());
        Self { snippets_dir }
    }

    /// Default destination offered when exporting.
    pub fn default_export_path(&self) -> PathBuf {
        self.snippets_dir.join(EXPORT_FILENAME)
    }
}

/// Get the platform's default user snippet directory
pub fn default_snippets_dir() -> PathBuf {
    platform_snippets_dir().unwrap_or_else(|| PathBuf::from(".snipvault").join("snippets"))
}

#[cfg(target_os = "macos")]
fn platform_snippets_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join("Library/Application Support/Code/User/snippets"))
}

#[cfg(target_os = "windows")]
fn platform_snippets_dir() -> Option<PathBuf> {
    env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join("AppData").join("Roaming")))
        .map(|appdata| appdata.join("Code").join("User").join("snippets"))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_snippets_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config/Code/User/snippets"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Path of the markdown log inside a project
pub fn log_file_path(project_root: &Path) -> PathBuf {
    project_root.join(LOG_FILENAME)
}

/// Ensure a directory exists, creating it and its parents if needed
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        tracing::debug!("Creating directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| SnipvaultError::file(dir, e))?;
    }
    Ok(())
}
