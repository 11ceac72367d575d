//! User-facing snippet operations on top of the store and the markdown log.
//!
//! Store failures always propagate. Log failures are reported through the
//! notifier as warnings and never undo a store change that already happened.

use crate::config::{ensure_dir, SnipvaultConfig};
use crate::error::{Result, SnipvaultError};
use crate::interaction::Notifier;
use crate::models::{validate_language_id, validate_prefix, Collection, Snippet};
use crate::snippet_log::SnippetLog;
use crate::storage::{write_atomic, SnippetStore};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Every collection, keyed by language id. This is the export file format.
pub type Library = BTreeMap<String, Collection>;

#[derive(Debug, Clone)]
pub struct SnippetManager {
    store: SnippetStore,
    log: SnippetLog,
}

impl SnippetManager {
    pub fn new(store: SnippetStore, log: SnippetLog) -> Self {
        Self { store, log }
    }

    pub fn from_config(config: &SnipvaultConfig, project_root: Option<&Path>) -> Self {
        Self::new(
            SnippetStore::new(&config.snippets_dir),
            SnippetLog::for_project(project_root),
        )
    }

    /// The same store with the log bound to `project_root` instead.
    pub fn for_project(&self, project_root: Option<&Path>) -> Self {
        Self::new(self.store.clone(), SnippetLog::for_project(project_root))
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }

    pub fn log(&self) -> &SnippetLog {
        &self.log
    }

    /// Save `text` as a new snippet (or overwrite one with the same prefix).
    pub fn create_from_selection(
        &self,
        text: &str,
        prefix: &str,
        description: &str,
        language_id: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<Snippet> {
        if text.is_empty() {
            return Err(SnipvaultError::required("Selected text"));
        }
        validate_prefix(prefix)?;
        if description.trim().is_empty() {
            return Err(SnipvaultError::required("Snippet description"));
        }
        validate_language_id(language_id)?;

        let snippet = Snippet::from_text(prefix, text, description);
        let previous = self.store.upsert(language_id, snippet.clone())?;
        notifier.info(&format!(
            "Snippet saved globally to {}",
            self.store.collection_path(language_id).display()
        ));

        match self.record(&snippet, language_id, previous.as_ref()) {
            Ok(Some(path)) => notifier.info(&format!(
                "Snippet \"{}\" added to {}",
                snippet.prefix,
                path.display()
            )),
            Ok(None) => warn_no_project(notifier),
            Err(e) => warn_log_failure(notifier, &snippet.prefix, &e),
        }

        Ok(snippet)
    }

    /// Delete a snippet and its log entry.
    pub fn delete(
        &self,
        language_id: &str,
        prefix: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<Snippet> {
        validate_language_id(language_id)?;
        if !self.store.collection_exists(language_id) {
            return Err(SnipvaultError::NotFound(format!(
                "No snippets saved for language '{}'",
                language_id
            )));
        }

        let removed = self.store.remove(language_id, prefix)?.ok_or_else(|| {
            SnipvaultError::NotFound(format!(
                "Snippet \"{}\" not found in {}",
                prefix,
                self.store.collection_path(language_id).display()
            ))
        })?;
        notifier.info(&format!("Snippet \"{}\" deleted.", prefix));

        match self.log.remove_for_language(&removed.prefix, language_id) {
            Ok(0) => {}
            Ok(_) => {
                if let Some(path) = self.log.path() {
                    notifier.info(&format!(
                        "Snippet \"{}\" removed from {}.",
                        prefix,
                        path.display()
                    ));
                }
            }
            Err(e) => warn_log_failure(notifier, &removed.prefix, &e),
        }

        Ok(removed)
    }

    /// Merge an imported document (one snippet or a prefix mapping) into the
    /// collection for `language_id`. Returns the number of snippets processed.
    pub fn import_from(
        &self,
        parsed: &Value,
        language_id: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<usize> {
        validate_language_id(language_id)?;
        let imported = normalize_import(parsed)?;

        let existing = self.store.load(language_id)?;
        let entries: Vec<(Option<Snippet>, Snippet)> = imported
            .iter()
            .map(|(key, snippet)| (existing.get(key).cloned(), snippet.clone()))
            .collect();
        let count = self.store.merge_import(language_id, imported)?;

        let mut logged = 0;
        let mut unbound = false;
        for (previous, snippet) in &entries {
            match self.record(snippet, language_id, previous.as_ref()) {
                Ok(Some(_)) => logged += 1,
                Ok(None) => unbound = true,
                Err(e) => warn_log_failure(notifier, &snippet.prefix, &e),
            }
        }

        if unbound {
            warn_no_project(notifier);
        } else if let Some(path) = self.log.path().filter(|_| logged > 0) {
            notifier.info(&format!(
                "Added {} snippet(s) to {}",
                logged,
                path.display()
            ));
        }
        notifier.info(&format!(
            "Imported {} snippet(s) successfully for {}!",
            count, language_id
        ));

        Ok(count)
    }

    /// Read and import a snippet file.
    pub fn import_file(
        &self,
        path: &Path,
        language_id: &str,
        notifier: &mut dyn Notifier,
    ) -> Result<usize> {
        validate_language_id(language_id)?;
        let parsed = read_import_file(path)?;
        self.import_from(&parsed, language_id, notifier)
    }

    /// Every known collection, keyed by language.
    pub fn export_all(&self) -> Result<Library> {
        let languages = self.store.list_languages()?;
        if languages.is_empty() {
            return Err(SnipvaultError::NotFound(format!(
                "No snippets found to export in {}",
                self.store.root().display()
            )));
        }

        languages
            .into_iter()
            .map(|language| {
                let collection = self.store.load(&language)?;
                Ok((language, collection))
            })
            .collect()
    }

    /// Export every collection to `destination`. Returns the number of
    /// languages written.
    pub fn export_to(&self, destination: &Path, notifier: &mut dyn Notifier) -> Result<usize> {
        let library = self.export_all()?;
        write_library(&library, destination)?;
        notifier.info(&format!("Snippets exported to {}", destination.display()));
        Ok(library.len())
    }

    /// Collections for one language, or all of them.
    pub fn list(&self, language_id: Option<&str>) -> Result<Library> {
        match language_id {
            Some(language) => {
                validate_language_id(language)?;
                if !self.store.collection_exists(language) {
                    return Err(SnipvaultError::NotFound(format!(
                        "No snippets saved for language '{}'",
                        language
                    )));
                }
                Ok(Library::from([(
                    language.to_string(),
                    self.store.load(language)?,
                )]))
            }
            None => self
                .store
                .list_languages()?
                .into_iter()
                .map(|language| {
                    let collection = self.store.load(&language)?;
                    Ok((language, collection))
                })
                .collect(),
        }
    }

    // Keep one block per snippet and language: drop the old one on overwrite.
    fn record(
        &self,
        snippet: &Snippet,
        language_id: &str,
        previous: Option<&Snippet>,
    ) -> Result<Option<&Path>> {
        if let Some(previous) = previous {
            self.log.remove_for_language(&previous.prefix, language_id)?;
        }
        self.log.append(snippet, language_id)
    }
}

pub(crate) fn write_library(library: &Library, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let serialized = serde_json::to_string_pretty(library)?;
    write_atomic(destination, serialized.as_bytes())
}

/// Read a file meant for import and parse it as JSON.
pub fn read_import_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| SnipvaultError::file(path, e))?;
    serde_json::from_str(&content).map_err(|e| {
        SnipvaultError::Validation(format!(
            "Failed to parse snippet file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Turn an imported document into the collection to merge. Mapping entries
/// keep their keys; a lone snippet is keyed by its prefix.
fn normalize_import(parsed: &Value) -> Result<Collection> {
    let Value::Object(fields) = parsed else {
        return Err(SnipvaultError::Validation(
            "Imported snippets must be a JSON object".to_string(),
        ));
    };

    if is_single_snippet(fields) {
        let snippet: Snippet = serde_json::from_value(parsed.clone()).map_err(|e| {
            SnipvaultError::Validation(format!("Imported snippet is invalid: {}", e))
        })?;
        validate_prefix(&snippet.prefix)?;
        return Ok(Collection::from([(snippet.prefix.clone(), snippet)]));
    }

    if fields.is_empty() {
        return Err(SnipvaultError::Validation(
            "Imported document contains no snippets".to_string(),
        ));
    }

    let mut collection = Collection::new();
    for (key, value) in fields {
        let mut snippet: Snippet = serde_json::from_value(value.clone()).map_err(|e| {
            SnipvaultError::Validation(format!("Imported entry \"{}\" is not a snippet: {}", key, e))
        })?;
        if snippet.prefix.trim().is_empty() {
            snippet.prefix = key.clone();
        }
        validate_prefix(&snippet.prefix)?;
        collection.insert(key.clone(), snippet);
    }
    Ok(collection)
}

fn is_single_snippet(fields: &Map<String, Value>) -> bool {
    ["prefix", "body", "description"]
        .iter()
        .all(|field| fields.get(*field).is_some_and(is_truthy))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn warn_no_project(notifier: &mut dyn Notifier) {
    notifier.warn("No active project found. Snippet names cannot be saved to the project folder.");
}

fn warn_log_failure(notifier: &mut dyn Notifier, prefix: &str, error: &SnipvaultError) {
    tracing::warn!("Failed to update snippet log for '{}': {}", prefix, error);
    notifier.warn(&format!(
        "Snippet \"{}\" is saved, but the project log could not be updated: {}",
        prefix, error
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::RecordingNotifier;
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        manager: SnippetManager,
        notifier: RecordingNotifier,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let config = SnipvaultConfig::new(temp.path().join("snippets"));
        let manager = SnippetManager::from_config(&config, Some(&project));
        Fixture {
            _temp: temp,
            manager,
            notifier: RecordingNotifier::default(),
        }
    }

    fn log_text(manager: &SnippetManager) -> String {
        fs::read_to_string(manager.log().path().unwrap()).unwrap_or_default()
    }

    #[test]
    fn create_stores_and_logs() {
        let mut f = fixture();
        let snippet = f
            .manager
            .create_from_selection(
                "fetch(url)",
                "fetchIt",
                "fetch wrapper",
                "javascript",
                &mut f.notifier,
            )
            .unwrap();

        assert_eq!(snippet.body, vec!["fetch(url)"]);
        let collection = f.manager.store().load("javascript").unwrap();
        assert_eq!(collection.get("fetchIt"), Some(&snippet));
        assert!(log_text(&f.manager).contains("### fetchIt\n"));
        assert_eq!(f.notifier.infos.len(), 2);
        assert!(f.notifier.warns.is_empty());
    }

    #[test]
    fn create_names_the_missing_field() {
        let mut f = fixture();
        let cases = [
            ("", "p", "d", "Selected text"),
            ("t", "", "d", "prefix"),
            ("t", "p", "", "description"),
            ("t", "p", "d", "Language"),
        ];
        for (text, prefix, description, field) in cases {
            let language = if field == "Language" { "" } else { "go" };
            match f.manager.create_from_selection(
                text,
                prefix,
                description,
                language,
                &mut f.notifier,
            ) {
                Err(SnipvaultError::Validation(msg)) => {
                    assert!(msg.contains(field), "{msg:?} should mention {field}")
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
        assert!(f.manager.store().list_languages().unwrap().is_empty());
    }

    #[test]
    fn overwriting_keeps_a_single_log_entry() {
        let mut f = fixture();
        f.manager
            .create_from_selection("a", "dup", "first", "go", &mut f.notifier)
            .unwrap();
        f.manager
            .create_from_selection("b", "dup", "second", "go", &mut f.notifier)
            .unwrap();

        let log = log_text(&f.manager);
        assert_eq!(log.matches("### dup\n").count(), 1);
        assert!(log.contains("second"));
        assert_eq!(f.manager.store().load("go").unwrap()["dup"].body, vec!["b"]);
    }

    #[test]
    fn missing_project_skips_log_with_warning() {
        let temp = TempDir::new().unwrap();
        let manager = SnippetManager::new(
            SnippetStore::new(temp.path().join("snippets")),
            SnippetLog::unbound(),
        );
        let mut notifier = RecordingNotifier::default();

        manager
            .create_from_selection("x", "x", "x", "go", &mut notifier)
            .unwrap();

        assert!(manager.store().load("go").unwrap().contains_key("x"));
        assert_eq!(notifier.warns.len(), 1);
    }

    #[test]
    fn log_failure_is_downgraded_to_warning() {
        let mut f = fixture();
        // A directory where the log file should be makes every log write fail.
        fs::create_dir(f.manager.log().path().unwrap()).unwrap();

        f.manager
            .create_from_selection("x", "x", "x", "go", &mut f.notifier)
            .unwrap();

        assert!(f.manager.store().load("go").unwrap().contains_key("x"));
        assert_eq!(f.notifier.warns.len(), 1);
        assert!(f.notifier.warns[0].contains("\"x\""));
    }

    #[test]
    fn delete_removes_store_entry_and_log_block() {
        let mut f = fixture();
        f.manager
            .create_from_selection("fetch(url)", "fetchIt", "w", "javascript", &mut f.notifier)
            .unwrap();

        let removed = f
            .manager
            .delete("javascript", "fetchIt", &mut f.notifier)
            .unwrap();

        assert_eq!(removed.prefix, "fetchIt");
        assert!(f.manager.store().load("javascript").unwrap().is_empty());
        assert_eq!(log_text(&f.manager), "");
    }

    #[test]
    fn delete_unknown_targets_is_not_found() {
        let mut f = fixture();
        assert!(matches!(
            f.manager.delete("python", "nope", &mut f.notifier),
            Err(SnipvaultError::NotFound(_))
        ));

        f.manager
            .create_from_selection("x", "keep", "k", "python", &mut f.notifier)
            .unwrap();
        let before = f.manager.store().load("python").unwrap();
        assert!(matches!(
            f.manager.delete("python", "nope", &mut f.notifier),
            Err(SnipvaultError::NotFound(_))
        ));
        assert_eq!(f.manager.store().load("python").unwrap(), before);
    }

    #[test]
    fn delete_with_log_failure_still_deletes() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "x", "x", "go", &mut f.notifier)
            .unwrap();
        let log_path = f.manager.log().path().unwrap().to_path_buf();
        fs::remove_file(&log_path).unwrap();
        fs::create_dir(&log_path).unwrap();

        f.manager.delete("go", "x", &mut f.notifier).unwrap();

        assert!(f.manager.store().load("go").unwrap().is_empty());
        assert_eq!(f.notifier.warns.len(), 1);
    }

    #[test]
    fn import_single_snippet() {
        let mut f = fixture();
        let doc = json!({"prefix": "hello", "body": ["print('hi')"], "description": "greet"});

        assert_eq!(
            f.manager.import_from(&doc, "python", &mut f.notifier).unwrap(),
            1
        );

        let collection = f.manager.store().load("python").unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection["hello"].body, vec!["print('hi')"]);
        assert!(log_text(&f.manager).contains("### hello\n"));
    }

    #[test]
    fn import_mapping_creates_one_entry_per_key() {
        let mut f = fixture();
        let doc = json!({
            "Print": {"prefix": "pr", "body": "print($1)", "description": "print"},
            "Main": {"prefix": "main", "body": ["if __name__ == '__main__':", "    main()"]},
            "Bare": {"body": ["pass"]}
        });

        assert_eq!(
            f.manager.import_from(&doc, "python", &mut f.notifier).unwrap(),
            3
        );

        let collection = f.manager.store().load("python").unwrap();
        let keys: Vec<_> = collection.keys().cloned().collect();
        assert_eq!(keys, vec!["Bare", "Main", "Print"]);
        assert_eq!(collection["Print"].prefix, "pr");
        assert_eq!(collection["Print"].body, vec!["print($1)"]);
        let log = log_text(&f.manager);
        assert!(log.contains("### pr\n"));
        assert!(log.contains("### Bare\n- **Description**: No description\n"));
    }

    #[test]
    fn reimporting_named_entries_keeps_one_log_block_each() {
        let mut f = fixture();
        let doc = json!({"Print to console": {"prefix": "pr", "body": ["print()"], "description": "old"}});
        f.manager.import_from(&doc, "python", &mut f.notifier).unwrap();
        let doc = json!({"Print to console": {"prefix": "pr", "body": ["print()"], "description": "new"}});
        f.manager.import_from(&doc, "python", &mut f.notifier).unwrap();

        let log = log_text(&f.manager);
        assert_eq!(log.matches("### pr\n").count(), 1);
        assert!(log.contains("- **Description**: new\n"));
    }

    #[test]
    fn delete_by_prefix_finds_named_entries() {
        let mut f = fixture();
        let doc = json!({"Print to console": {"prefix": "pr", "body": ["print()"], "description": "p"}});
        f.manager.import_from(&doc, "python", &mut f.notifier).unwrap();

        let removed = f.manager.delete("python", "pr", &mut f.notifier).unwrap();

        assert_eq!(removed.prefix, "pr");
        assert!(f.manager.store().load("python").unwrap().is_empty());
        assert_eq!(log_text(&f.manager), "");
    }

    #[test]
    fn import_overwrites_without_duplicate_log_entries() {
        let mut f = fixture();
        f.manager
            .create_from_selection("old", "pr", "old", "python", &mut f.notifier)
            .unwrap();
        let doc = json!({"pr": {"prefix": "pr", "body": ["new"], "description": "new"}});

        f.manager.import_from(&doc, "python", &mut f.notifier).unwrap();

        assert_eq!(f.manager.store().load("python").unwrap()["pr"].body, vec!["new"]);
        assert_eq!(log_text(&f.manager).matches("### pr\n").count(), 1);
    }

    #[test]
    fn import_rejects_bad_input() {
        let mut f = fixture();
        let doc = json!({"a": {"prefix": "a", "body": ["x"], "description": "d"}});

        assert!(matches!(
            f.manager.import_from(&doc, "", &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
        assert!(matches!(
            f.manager.import_from(&json!([1, 2]), "go", &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
        assert!(matches!(
            f.manager.import_from(&json!({}), "go", &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
        match f
            .manager
            .import_from(&json!({"broken": 42}), "go", &mut f.notifier)
        {
            Err(SnipvaultError::Validation(msg)) => assert!(msg.contains("broken")),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(f.manager.store().list_languages().unwrap().is_empty());
    }

    #[test]
    fn import_file_reports_malformed_json() {
        let mut f = fixture();
        let path = f.manager.store().root().with_file_name("bad.json");
        fs::write(&path, "{ nope").unwrap();

        match f.manager.import_file(&path, "go", &mut f.notifier) {
            Err(SnipvaultError::Validation(msg)) => assert!(msg.contains("bad.json")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn export_requires_some_collection() {
        let f = fixture();
        assert!(matches!(
            f.manager.export_all(),
            Err(SnipvaultError::NotFound(_))
        ));
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut f = fixture();
        f.manager
            .create_from_selection("a\nb", "two", "two lines", "rust", &mut f.notifier)
            .unwrap();
        f.manager
            .create_from_selection("x", "one", "one line", "go", &mut f.notifier)
            .unwrap();
        let exported = f.manager.export_all().unwrap();

        let target = fixture();
        let mut notifier = RecordingNotifier::default();
        for (language, collection) in &exported {
            let doc = serde_json::to_value(collection).unwrap();
            target.manager.import_from(&doc, language, &mut notifier).unwrap();
        }

        assert_eq!(target.manager.export_all().unwrap(), exported);
    }

    #[test]
    fn round_trip_keeps_keys_that_differ_from_prefixes() {
        let f = fixture();
        fs::create_dir_all(f.manager.store().root()).unwrap();
        fs::write(
            f.manager.store().collection_path("python"),
            r#"{"Print to console": {"prefix": "pr", "body": ["print($1)"], "description": "Log output"}}"#,
        )
        .unwrap();
        let exported = f.manager.export_all().unwrap();

        let target = fixture();
        let mut notifier = RecordingNotifier::default();
        let doc = serde_json::to_value(&exported["python"]).unwrap();
        target.manager.import_from(&doc, "python", &mut notifier).unwrap();

        assert_eq!(target.manager.export_all().unwrap(), exported);
        assert!(target.manager.store().load("python").unwrap().contains_key("Print to console"));
    }

    #[test]
    fn for_project_rebinds_only_the_log() {
        let mut f = fixture();
        let unbound = f.manager.for_project(None);

        unbound
            .create_from_selection("x", "x", "d", "go", &mut f.notifier)
            .unwrap();

        assert_eq!(unbound.log().path(), None);
        assert!(f.manager.store().load("go").unwrap().contains_key("x"));
        assert_eq!(log_text(&f.manager), "");
    }

    #[test]
    fn export_to_writes_library_file() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "x", "x", "go", &mut f.notifier)
            .unwrap();
        let destination = f.manager.store().root().join("out").join("all.json");

        assert_eq!(f.manager.export_to(&destination, &mut f.notifier).unwrap(), 1);

        let written: Library =
            serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
        assert_eq!(written, f.manager.export_all().unwrap());
    }

    #[test]
    fn list_single_language_requires_collection() {
        let mut f = fixture();
        assert!(f.manager.list(None).unwrap().is_empty());
        assert!(matches!(
            f.manager.list(Some("go")),
            Err(SnipvaultError::NotFound(_))
        ));

        f.manager
            .create_from_selection("x", "x", "x", "go", &mut f.notifier)
            .unwrap();
        assert_eq!(f.manager.list(Some("go")).unwrap()["go"].len(), 1);
    }
}
