//! The `SavedSnippets.md` mirror kept at a project's root.
//!
//! Every entry is a three-line block followed by a blank line:
//!
//! ```text
//! ### fetchIt
//! - **Description**: fetch wrapper
//! - **Language**: javascript
//!
//! ```
//!
//! Blocks are appended verbatim, with no padding, so removing a block gives
//! back the exact bytes the document had before it was appended. Removal
//! looks for the same template `render_entry` writes wherever a heading
//! starts, so the two must change together.

use crate::config::{log_file_path, NO_DESCRIPTION};
use crate::error::{Result, SnipvaultError};
use crate::models::Snippet;
use crate::storage::write_atomic;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const HEADING: &str = "### ";
const DESCRIPTION_LABEL: &str = "- **Description**: ";
const LANGUAGE_LABEL: &str = "- **Language**: ";
const BLOCK_END: &str = "\n\n";

#[derive(Debug, Clone, Default)]
pub struct SnippetLog {
    path: Option<PathBuf>,
}

impl SnippetLog {
    /// Bind the log to a project root. Without one every operation is a no-op.
    pub fn for_project(project_root: Option<&Path>) -> Self {
        Self {
            path: project_root.map(log_file_path),
        }
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the block written for a snippet.
    pub fn render_entry(snippet: &Snippet, language_id: &str) -> String {
        format!(
            "{HEADING}{}\n{DESCRIPTION_LABEL}{}\n{LANGUAGE_LABEL}{}{BLOCK_END}",
            snippet.prefix,
            single_line_description(&snippet.description),
            language_id
        )
    }

    /// Append a block for `snippet`. Returns the log path when something was
    /// written, `None` when no project is bound.
    pub fn append(&self, snippet: &Snippet, language_id: &str) -> Result<Option<&Path>> {
        let Some(path) = self.path() else {
            return Ok(None);
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SnipvaultError::file(path, e))?;
        let entry = Self::render_entry(snippet, language_id);
        file.write_all(entry.as_bytes())
            .map_err(|e| SnipvaultError::file(path, e))?;

        tracing::debug!("Appended '{}' to {}", snippet.prefix, path.display());
        Ok(Some(path))
    }

    /// Remove every block headed by `prefix`, whatever its language.
    pub fn remove(&self, prefix: &str) -> Result<usize> {
        self.remove_matching(prefix, None)
    }

    /// Remove the blocks headed by `prefix` that were logged for `language_id`.
    pub fn remove_for_language(&self, prefix: &str, language_id: &str) -> Result<usize> {
        self.remove_matching(prefix, Some(language_id))
    }

    fn remove_matching(&self, prefix: &str, language_id: Option<&str>) -> Result<usize> {
        let Some(path) = self.path() else {
            return Ok(0);
        };
        let Some(content) = read_if_exists(path)? else {
            return Ok(0);
        };

        let mut kept = String::with_capacity(content.len());
        let mut removed = 0;
        let mut cursor = 0;
        for (start, _) in content.match_indices(HEADING) {
            // Skip headings inside an earlier match and deeper headings.
            if start < cursor || content[..start].ends_with('#') {
                continue;
            }
            if let Some(len) = entry_len(&content[start..], prefix, language_id) {
                kept.push_str(&content[cursor..start]);
                cursor = start + len;
                removed += 1;
            }
        }
        kept.push_str(&content[cursor..]);

        if removed > 0 {
            write_atomic(path, kept.as_bytes())?;
            tracing::debug!(
                "Removed {} block(s) for '{}' from {}",
                removed,
                prefix,
                path.display()
            );
        }
        Ok(removed)
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SnipvaultError::file(path, e)),
    }
}

fn single_line_description(description: &str) -> String {
    let flattened = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if flattened.is_empty() {
        NO_DESCRIPTION.to_string()
    } else if description.contains(['\n', '\r']) {
        flattened
    } else {
        description.to_string()
    }
}

/// Byte length of the block at the start of `text` if it is the entry for
/// `prefix` (and `language_id`, when given).
fn entry_len(text: &str, prefix: &str, language_id: Option<&str>) -> Option<usize> {
    let mut lines = [""; 3];
    let mut offset = 0;
    for line in &mut lines {
        let end = text[offset..].find('\n')?;
        *line = &text[offset..offset + end];
        offset += end + 1;
    }
    // The third line's newline plus the blank line closing the block.
    if !text[offset - 1..].starts_with(BLOCK_END) {
        return None;
    }

    let [heading, description, language] = lines;
    let matches = heading.strip_prefix(HEADING) == Some(prefix)
        && description.starts_with(DESCRIPTION_LABEL)
        && language
            .strip_prefix(LANGUAGE_LABEL)
            .is_some_and(|logged| language_id.map_or(true, |wanted| logged == wanted));
    matches.then_some(offset + 1)
}
