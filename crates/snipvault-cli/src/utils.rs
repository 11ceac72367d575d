use snipvault_core::{get_clipboard_text, Library, Result, SnipvaultError};
use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Where the selection for `add` and `new` comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    Text(String),
    Clipboard,
    File(PathBuf),
    Stdin,
}

impl SelectionSource {
    pub fn pick(text: Option<String>, file: Option<PathBuf>, clipboard: bool) -> Self {
        match (text, file) {
            (Some(text), _) => SelectionSource::Text(text),
            (None, Some(file)) => SelectionSource::File(file),
            (None, None) if clipboard => SelectionSource::Clipboard,
            (None, None) => SelectionSource::Stdin,
        }
    }

    pub fn read(&self) -> Result<String> {
        match self {
            SelectionSource::Text(text) => Ok(text.clone()),
            SelectionSource::Clipboard => get_clipboard_text(),
            SelectionSource::File(path) => fs::read_to_string(path)
                .map(|text| strip_final_newline(&text).to_string())
                .map_err(|source| SnipvaultError::File {
                    path: path.clone(),
                    source,
                }),
            SelectionSource::Stdin => {
                let mut stdin = io::stdin();
                if stdin.is_terminal() {
                    eprintln!("Reading snippet text from stdin (Ctrl-D to finish)...");
                }
                let mut text = String::new();
                stdin.read_to_string(&mut text)?;
                Ok(strip_final_newline(&text).to_string())
            }
        }
    }
}

// Files and pipes end with a newline that is not part of the selection.
pub fn strip_final_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Guess the editor language id from a file extension.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "typescriptreact",
        "py" => "python",
        "rs" => "rust",
        "go" => "go",
        "rb" => "ruby",
        "java" => "java",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "sh" | "bash" => "shellscript",
        "html" | "htm" => "html",
        "css" => "css",
        "json" => "json",
        "md" => "markdown",
        "yml" | "yaml" => "yaml",
        "sql" => "sql",
        _ => return None,
    };
    Some(language)
}

/// Project whose `SavedSnippets.md` gets updated, if any.
pub fn resolve_project_root(project: Option<PathBuf>, no_log: bool) -> Option<PathBuf> {
    if no_log {
        return None;
    }
    project.or_else(|| env::current_dir().ok())
}

pub fn print_library(library: &Library, snippets_dir: &Path) {
    if library.values().all(|collection| collection.is_empty()) {
        println!("No snippets saved yet in {}", snippets_dir.display());
        return;
    }

    for (language, collection) in library {
        println!("{} ({})", language, collection.len());
        for (key, snippet) in collection {
            let description = snippet.description.lines().next().unwrap_or_default();
            if key == &snippet.prefix {
                println!("  {:<24} {}", key, description);
            } else {
                println!("  {:<24} {} (prefix: {})", key, description, snippet.prefix);
            }
        }
    }
}
