use crate::config::EXPORT_FILENAME;
use crate::error::{Result, SnipvaultError};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

/// A named, reusable block of text as stored in a language collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    #[serde(default)]
    pub prefix: String,
    #[serde(deserialize_with = "deserialize_body")]
    pub body: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// All snippets of one language, keyed by prefix.
pub type Collection = BTreeMap<String, Snippet>;

impl Snippet {
    pub fn new(prefix: impl Into<String>, body: Vec<String>, description: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            body,
            description: description.into(),
        }
    }

    /// Build a snippet from raw text, one body entry per line.
    pub fn from_text(
        prefix: impl Into<String>,
        text: &str,
        description: impl Into<String>,
    ) -> Self {
        Self::new(prefix, split_lines(text), description)
    }

    /// The body joined back into a single string.
    pub fn text(&self) -> String {
        self.body.join("\n")
    }
}

pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

// Editor snippet files allow the body as either a list of lines or one string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBody {
    Lines(Vec<String>),
    Text(String),
}

fn deserialize_body<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawBody::deserialize(deserializer)? {
        RawBody::Lines(lines) => lines,
        RawBody::Text(text) => split_lines(&text),
    })
}

/// Check that a prefix can be used as a collection key and a log heading.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(SnipvaultError::required("Snippet name (prefix)"));
    }
    if prefix.contains(['\n', '\r']) {
        return Err(SnipvaultError::Validation(format!(
            "Snippet name (prefix) '{}' must be a single line",
            prefix.escape_debug()
        )));
    }
    Ok(())
}

/// Check that a language id can name a collection file.
pub fn validate_language_id(language_id: &str) -> Result<()> {
    if language_id.trim().is_empty() {
        return Err(SnipvaultError::required("Language"));
    }
    if language_id == "."
        || language_id == ".."
        || language_id.contains(['/', '\\', '\n', '\r'])
    {
        return Err(SnipvaultError::Validation(format!(
            "Language '{}' cannot be used as a snippet file name",
            language_id.escape_debug()
        )));
    }
    // The export file lives next to the collections.
    if Path::new(EXPORT_FILENAME).file_stem() == Some(OsStr::new(language_id)) {
        return Err(SnipvaultError::Validation(format!(
            "Language '{}' is reserved for exported snippets",
            language_id
        )));
    }
    Ok(())
}
