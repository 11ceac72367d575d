//! Durable per-language snippet collections.
//!
//! Each language lives in `<snippets_dir>/<languageId>.json` as a JSON object
//! mapping prefix to snippet. Every mutation is a full load/modify/save cycle
//! with no locking: if another process rewrites a file between our load and
//! save, the last writer wins.

use crate::config::ensure_dir;
use crate::error::{Result, SnipvaultError};
use crate::models::{validate_language_id, Collection, Snippet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const COLLECTION_EXT: &str = "json";

#[derive(Debug, Clone)]
pub struct SnippetStore {
    root: PathBuf,
}

impl SnippetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the collection file for a language
    pub fn collection_path(&self, language_id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", language_id, COLLECTION_EXT))
    }

    pub fn collection_exists(&self, language_id: &str) -> bool {
        validate_language_id(language_id).is_ok() && self.collection_path(language_id).is_file()
    }

    /// Load the collection for a language; missing or blank files are empty.
    pub fn load(&self, language_id: &str) -> Result<Collection> {
        validate_language_id(language_id)?;
        let path = self.collection_path(language_id);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Collection::new()),
            Err(e) => return Err(SnipvaultError::file(path, e)),
        };

        // Handle empty collection file
        if content.trim().is_empty() {
            return Ok(Collection::new());
        }

        let collection: Collection =
            serde_json::from_str(&content).map_err(|source| SnipvaultError::CorruptStore {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            "Loaded {} snippet(s) from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Write a full collection, replacing the previous file atomically.
    pub fn save(&self, language_id: &str, collection: &Collection) -> Result<()> {
        validate_language_id(language_id)?;
        ensure_dir(&self.root)?;

        let path = self.collection_path(language_id);
        let serialized = serde_json::to_string_pretty(collection)?;
        write_atomic(&path, serialized.as_bytes())?;

        tracing::debug!(
            "Saved {} snippet(s) to {}",
            collection.len(),
            path.display()
        );
        Ok(())
    }

    /// Insert or overwrite a snippet by prefix, returning the one it replaced.
    pub fn upsert(&self, language_id: &str, snippet: Snippet) -> Result<Option<Snippet>> {
        let mut collection = self.load(language_id)?;
        let previous = collection.insert(snippet.prefix.clone(), snippet);
        self.save(language_id, &collection)?;
        Ok(previous)
    }

    /// Remove a snippet by key, or failing that by its `prefix` field, since
    /// editor snippet files key entries by a display name. The file is only
    /// rewritten when something was actually removed.
    pub fn remove(&self, language_id: &str, prefix: &str) -> Result<Option<Snippet>> {
        let mut collection = self.load(language_id)?;
        let key = if collection.contains_key(prefix) {
            Some(prefix.to_string())
        } else {
            collection
                .iter()
                .find(|(_, snippet)| snippet.prefix == prefix)
                .map(|(key, _)| key.clone())
        };
        let removed = key.and_then(|key| collection.remove(&key));
        if removed.is_some() {
            self.save(language_id, &collection)?;
        }
        Ok(removed)
    }

    /// All languages that have a collection file, sorted by name.
    pub fn list_languages(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(SnipvaultError::file(&self.root, e)),
        };

        let mut languages = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SnipvaultError::file(&self.root, e))?.path();
            let is_collection =
                path.extension().and_then(|ext| ext.to_str()) == Some(COLLECTION_EXT);
            if !is_collection || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_language_id(stem).is_ok() {
                    languages.push(stem.to_string());
                }
            }
        }

        languages.sort();
        Ok(languages)
    }

    /// Upsert every entry of `imported` under its own key in a single
    /// load/save cycle. Conflicting keys are overwritten.
    pub fn merge_import(&self, language_id: &str, imported: Collection) -> Result<usize> {
        let mut collection = self.load(language_id)?;
        let count = imported.len();
        collection.extend(imported);
        self.save(language_id, &collection)?;
        Ok(count)
    }
}

/// Write to a sibling temp file, then rename over the target.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, bytes).map_err(|e| SnipvaultError::file(&temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(SnipvaultError::file(path, e));
    }
    Ok(())
}
