//! Interactive flows, each written as a small state machine.
//!
//! A workflow starts at its first stage and advances one stage at a time.
//! Every stage that asks a collaborator for input either gets a value and
//! moves on, or gets nothing back and abandons the whole workflow without
//! touching the store.

use crate::config::EXPORT_FILENAME;
use crate::error::{Result, SnipvaultError};
use crate::interaction::{ActiveContext, FileDialog, FileFilter, Notifier, Picker, PromptProvider};
use crate::manager::{read_import_file, write_library, Library, SnippetManager};
use crate::models::{validate_language_id, validate_prefix, Snippet};
use serde_json::Value;
use std::path::PathBuf;

pub const PREFIX_PROMPT: &str = "Enter a name for your snippet (prefix)";
pub const PREFIX_PLACEHOLDER: &str = "e.g., mySnippetName";
pub const PREFIX_DEFAULT: &str = "exampleSnippet";
pub const DESCRIPTION_PROMPT: &str = "Enter a description for your snippet";
pub const DESCRIPTION_PLACEHOLDER: &str = "e.g., A reusable fetch function snippet";
pub const DESCRIPTION_DEFAULT: &str = "Generated snippet from selected text";
pub const LANGUAGE_PROMPT: &str = "Enter the language for these snippets (e.g., javascript, python)";
pub const LANGUAGE_PLACEHOLDER: &str = "e.g., javascript";
pub const LANGUAGE_DEFAULT: &str = "javascript";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome<T> {
    Completed(T),
    /// The user backed out; nothing was changed.
    Abandoned,
}

impl<T> WorkflowOutcome<T> {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, WorkflowOutcome::Abandoned)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            WorkflowOutcome::Completed(value) => Some(value),
            WorkflowOutcome::Abandoned => None,
        }
    }
}

enum Step<S, T> {
    Next(S),
    Done(T),
    Abandon,
}

trait Stage {
    fn name(&self) -> &'static str;
}

fn drive<S, T>(
    workflow: &str,
    mut stage: S,
    mut advance: impl FnMut(S) -> Result<Step<S, T>>,
) -> Result<WorkflowOutcome<T>>
where
    S: Stage,
{
    loop {
        tracing::debug!("{} workflow: entering {}", workflow, stage.name());
        let name = stage.name();
        stage = match advance(stage)? {
            Step::Next(next) => next,
            Step::Done(value) => return Ok(WorkflowOutcome::Completed(value)),
            Step::Abandon => {
                tracing::debug!("{} workflow abandoned at {}", workflow, name);
                return Ok(WorkflowOutcome::Abandoned);
            }
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewSnippetStage {
    CheckSelection,
    AskPrefix {
        text: String,
        language_id: String,
    },
    AskDescription {
        text: String,
        language_id: String,
        prefix: String,
    },
    Save {
        text: String,
        language_id: String,
        prefix: String,
        description: String,
    },
}

impl Stage for NewSnippetStage {
    fn name(&self) -> &'static str {
        match self {
            NewSnippetStage::CheckSelection => "check-selection",
            NewSnippetStage::AskPrefix { .. } => "ask-prefix",
            NewSnippetStage::AskDescription { .. } => "ask-description",
            NewSnippetStage::Save { .. } => "save",
        }
    }
}

/// Turn the active selection into a snippet: ask for a prefix, then a
/// description, then save.
pub struct NewSnippetWorkflow<'a> {
    manager: &'a SnippetManager,
    context: &'a ActiveContext,
}

impl<'a> NewSnippetWorkflow<'a> {
    pub fn new(manager: &'a SnippetManager, context: &'a ActiveContext) -> Self {
        Self { manager, context }
    }

    pub fn run(
        &self,
        prompts: &mut dyn PromptProvider,
        notifier: &mut dyn Notifier,
    ) -> Result<WorkflowOutcome<Snippet>> {
        drive("new-snippet", NewSnippetStage::CheckSelection, |stage| {
            self.advance(stage, prompts, notifier)
        })
    }

    fn advance(
        &self,
        stage: NewSnippetStage,
        prompts: &mut dyn PromptProvider,
        notifier: &mut dyn Notifier,
    ) -> Result<Step<NewSnippetStage, Snippet>> {
        Ok(match stage {
            NewSnippetStage::CheckSelection => {
                let Some(text) = self.context.selection() else {
                    notifier.warn("No text selected to generate a snippet.");
                    return Ok(Step::Abandon);
                };
                let language_id = self
                    .context
                    .language()
                    .ok_or_else(|| SnipvaultError::required("Active language"))?;
                Step::Next(NewSnippetStage::AskPrefix {
                    text: text.to_string(),
                    language_id: language_id.to_string(),
                })
            }
            NewSnippetStage::AskPrefix { text, language_id } => {
                match prompts.ask_text(PREFIX_PROMPT, PREFIX_PLACEHOLDER, PREFIX_DEFAULT)? {
                    Some(prefix) => {
                        validate_prefix(&prefix)?;
                        Step::Next(NewSnippetStage::AskDescription {
                            text,
                            language_id,
                            prefix,
                        })
                    }
                    None => Step::Abandon,
                }
            }
            NewSnippetStage::AskDescription {
                text,
                language_id,
                prefix,
            } => match prompts.ask_text(
                DESCRIPTION_PROMPT,
                DESCRIPTION_PLACEHOLDER,
                DESCRIPTION_DEFAULT,
            )? {
                Some(description) if description.trim().is_empty() => {
                    return Err(SnipvaultError::required("Snippet description"))
                }
                Some(description) => Step::Next(NewSnippetStage::Save {
                    text,
                    language_id,
                    prefix,
                    description,
                }),
                None => Step::Abandon,
            },
            NewSnippetStage::Save {
                text,
                language_id,
                prefix,
                description,
            } => Step::Done(
                self.manager
                    .for_project(self.context.project_root())
                    .create_from_selection(&text, &prefix, &description, &language_id, notifier)?,
            ),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStage {
    PickLanguage,
    PickSnippet { language_id: String },
    Delete { language_id: String, prefix: String },
}

impl Stage for DeleteStage {
    fn name(&self) -> &'static str {
        match self {
            DeleteStage::PickLanguage => "pick-language",
            DeleteStage::PickSnippet { .. } => "pick-snippet",
            DeleteStage::Delete { .. } => "delete",
        }
    }
}

/// Pick a language, then one of its snippets, then delete it.
pub struct DeleteWorkflow<'a> {
    manager: &'a SnippetManager,
    language_id: Option<String>,
}

impl<'a> DeleteWorkflow<'a> {
    pub fn new(manager: &'a SnippetManager) -> Self {
        Self {
            manager,
            language_id: None,
        }
    }

    /// Skip the language pick when the caller already knows it.
    pub fn for_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = Some(language_id.into());
        self
    }

    pub fn run(
        &self,
        picker: &mut dyn Picker,
        notifier: &mut dyn Notifier,
    ) -> Result<WorkflowOutcome<Snippet>> {
        let start = match &self.language_id {
            Some(language_id) => {
                validate_language_id(language_id)?;
                DeleteStage::PickSnippet {
                    language_id: language_id.clone(),
                }
            }
            None => DeleteStage::PickLanguage,
        };
        drive("delete", start, |stage| self.advance(stage, picker, notifier))
    }

    fn advance(
        &self,
        stage: DeleteStage,
        picker: &mut dyn Picker,
        notifier: &mut dyn Notifier,
    ) -> Result<Step<DeleteStage, Snippet>> {
        Ok(match stage {
            DeleteStage::PickLanguage => {
                let languages = self.manager.store().list_languages()?;
                if languages.is_empty() {
                    return Err(SnipvaultError::NotFound("No snippets found.".to_string()));
                }
                match picker.pick_one(&languages, "Select a snippet file to delete from")? {
                    Some(language_id) => Step::Next(DeleteStage::PickSnippet { language_id }),
                    None => Step::Abandon,
                }
            }
            DeleteStage::PickSnippet { language_id } => {
                let prefixes: Vec<String> = self
                    .manager
                    .store()
                    .load(&language_id)?
                    .into_keys()
                    .collect();
                if prefixes.is_empty() {
                    return Err(SnipvaultError::NotFound(format!(
                        "No snippets saved for language '{}'",
                        language_id
                    )));
                }
                match picker.pick_one(&prefixes, "Select a snippet to delete")? {
                    Some(prefix) => Step::Next(DeleteStage::Delete {
                        language_id,
                        prefix,
                    }),
                    None => Step::Abandon,
                }
            }
            DeleteStage::Delete {
                language_id,
                prefix,
            } => Step::Done(self.manager.delete(&language_id, &prefix, notifier)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportStage {
    ChooseFile,
    ReadFile { path: PathBuf },
    AskLanguage { parsed: Value },
    Import { parsed: Value, language_id: String },
}

impl Stage for ImportStage {
    fn name(&self) -> &'static str {
        match self {
            ImportStage::ChooseFile => "choose-file",
            ImportStage::ReadFile { .. } => "read-file",
            ImportStage::AskLanguage { .. } => "ask-language",
            ImportStage::Import { .. } => "import",
        }
    }
}

/// Choose a JSON file, ask which language it belongs to, then merge it.
pub struct ImportWorkflow<'a> {
    manager: &'a SnippetManager,
    context: &'a ActiveContext,
}

impl<'a> ImportWorkflow<'a> {
    pub fn new(manager: &'a SnippetManager, context: &'a ActiveContext) -> Self {
        Self { manager, context }
    }

    /// Start from a file the caller already chose.
    pub fn run_with_file(
        &self,
        path: PathBuf,
        prompts: &mut dyn PromptProvider,
        notifier: &mut dyn Notifier,
    ) -> Result<WorkflowOutcome<usize>> {
        drive("import", ImportStage::ReadFile { path }, |stage| {
            self.advance::<dyn FileDialog>(stage, None, prompts, notifier)
        })
    }

    pub fn run(
        &self,
        dialog: &mut dyn FileDialog,
        prompts: &mut dyn PromptProvider,
        notifier: &mut dyn Notifier,
    ) -> Result<WorkflowOutcome<usize>> {
        drive("import", ImportStage::ChooseFile, |stage| {
            self.advance(stage, Some(&mut *dialog), prompts, notifier)
        })
    }

    // Only `ChooseFile` needs the dialog.
    fn advance<D: FileDialog + ?Sized>(
        &self,
        stage: ImportStage,
        dialog: Option<&mut D>,
        prompts: &mut dyn PromptProvider,
        notifier: &mut dyn Notifier,
    ) -> Result<Step<ImportStage, usize>> {
        Ok(match stage {
            ImportStage::ChooseFile => {
                let dialog = dialog.ok_or_else(|| SnipvaultError::required("Import file"))?;
                match dialog.open_file(&[FileFilter::json()])? {
                    Some(path) => Step::Next(ImportStage::ReadFile { path }),
                    None => {
                        notifier.warn("No file selected.");
                        Step::Abandon
                    }
                }
            }
            ImportStage::ReadFile { path } => Step::Next(ImportStage::AskLanguage {
                parsed: read_import_file(&path)?,
            }),
            ImportStage::AskLanguage { parsed } => {
                let default = self.context.language().unwrap_or(LANGUAGE_DEFAULT);
                match prompts.ask_text(LANGUAGE_PROMPT, LANGUAGE_PLACEHOLDER, default)? {
                    Some(language_id) => {
                        validate_language_id(&language_id)?;
                        Step::Next(ImportStage::Import {
                            parsed,
                            language_id,
                        })
                    }
                    None => Step::Abandon,
                }
            }
            ImportStage::Import {
                parsed,
                language_id,
            } => Step::Done(
                self.manager
                    .for_project(self.context.project_root())
                    .import_from(&parsed, &language_id, notifier)?,
            ),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStage {
    Collect,
    ChooseDestination { library: Library },
    Write { library: Library, path: PathBuf },
}

impl Stage for ExportStage {
    fn name(&self) -> &'static str {
        match self {
            ExportStage::Collect => "collect",
            ExportStage::ChooseDestination { .. } => "choose-destination",
            ExportStage::Write { .. } => "write",
        }
    }
}

/// Gather every collection, ask where to put them, then write one file.
pub struct ExportWorkflow<'a> {
    manager: &'a SnippetManager,
}

impl<'a> ExportWorkflow<'a> {
    pub fn new(manager: &'a SnippetManager) -> Self {
        Self { manager }
    }

    pub fn run(
        &self,
        dialog: &mut dyn FileDialog,
        notifier: &mut dyn Notifier,
    ) -> Result<WorkflowOutcome<PathBuf>> {
        drive("export", ExportStage::Collect, |stage| {
            self.advance(stage, dialog, notifier)
        })
    }

    fn advance(
        &self,
        stage: ExportStage,
        dialog: &mut dyn FileDialog,
        notifier: &mut dyn Notifier,
    ) -> Result<Step<ExportStage, PathBuf>> {
        Ok(match stage {
            ExportStage::Collect => Step::Next(ExportStage::ChooseDestination {
                library: self.manager.export_all()?,
            }),
            ExportStage::ChooseDestination { library } => {
                let default_path = self.manager.store().root().join(EXPORT_FILENAME);
                match dialog.save_file(&[FileFilter::json()], &default_path)? {
                    Some(path) => Step::Next(ExportStage::Write { library, path }),
                    None => {
                        notifier.warn("Export cancelled.");
                        Step::Abandon
                    }
                }
            }
            ExportStage::Write { library, path } => {
                write_library(&library, &path)?;
                notifier.info(&format!("Snippets exported to {}", path.display()));
                Step::Done(path)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::RecordingNotifier;
    use crate::snippet_log::SnippetLog;
    use crate::storage::SnippetStore;
    use std::collections::VecDeque;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Scripted {
        answers: VecDeque<Option<String>>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn answering(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
                asked: vec![],
            }
        }

        fn next(&mut self, label: &str) -> Option<String> {
            self.asked.push(label.to_string());
            self.answers.pop_front().expect("unexpected question")
        }
    }

    impl PromptProvider for Scripted {
        fn ask_text(&mut self, label: &str, _: &str, _: &str) -> Result<Option<String>> {
            Ok(self.next(label))
        }
    }

    impl Picker for Scripted {
        fn pick_one(&mut self, options: &[String], label: &str) -> Result<Option<String>> {
            let answer = self.next(label);
            if let Some(choice) = &answer {
                assert!(options.contains(choice), "{choice} not offered");
            }
            Ok(answer)
        }
    }

    struct Dialog(Option<PathBuf>);

    impl FileDialog for Dialog {
        fn open_file(&mut self, filters: &[FileFilter]) -> Result<Option<PathBuf>> {
            assert_eq!(filters, &[FileFilter::json()]);
            Ok(self.0.take())
        }

        fn save_file(&mut self, _: &[FileFilter], default_path: &Path) -> Result<Option<PathBuf>> {
            assert!(default_path.ends_with(EXPORT_FILENAME));
            Ok(self.0.take())
        }
    }

    // Accepts whatever destination the workflow suggests.
    struct AcceptDefault;

    impl FileDialog for AcceptDefault {
        fn open_file(&mut self, _: &[FileFilter]) -> Result<Option<PathBuf>> {
            Ok(None)
        }

        fn save_file(&mut self, _: &[FileFilter], default_path: &Path) -> Result<Option<PathBuf>> {
            Ok(Some(default_path.to_path_buf()))
        }
    }

    struct Fixture {
        temp: TempDir,
        manager: SnippetManager,
        notifier: RecordingNotifier,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let manager = SnippetManager::new(
            SnippetStore::new(temp.path().join("snippets")),
            SnippetLog::for_project(Some(temp.path())),
        );
        Fixture {
            temp,
            manager,
            notifier: RecordingNotifier::default(),
        }
    }

    fn context(selection: Option<&str>, language: Option<&str>) -> ActiveContext {
        ActiveContext {
            selected_text: selection.map(str::to_string),
            language_id: language.map(str::to_string),
            project_root: None,
        }
    }

    #[test]
    fn new_snippet_asks_prefix_then_description() {
        let mut f = fixture();
        let ctx = context(Some("fetch(url)"), Some("javascript"));
        let mut prompts = Scripted::answering(&[Some("fetchIt"), Some("fetch wrapper")]);

        let outcome = NewSnippetWorkflow::new(&f.manager, &ctx)
            .run(&mut prompts, &mut f.notifier)
            .unwrap();

        let snippet = outcome.completed().unwrap();
        assert_eq!(snippet.prefix, "fetchIt");
        assert_eq!(prompts.asked, vec![PREFIX_PROMPT, DESCRIPTION_PROMPT]);
        assert!(f.manager.store().load("javascript").unwrap().contains_key("fetchIt"));
    }

    #[test]
    fn new_snippet_logs_into_the_context_project() {
        let mut f = fixture();
        let project = f.temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let mut ctx = context(Some("x"), Some("go"));
        ctx.project_root = Some(project.clone());
        let mut prompts = Scripted::answering(&[Some("name"), Some("desc")]);

        NewSnippetWorkflow::new(&f.manager, &ctx)
            .run(&mut prompts, &mut f.notifier)
            .unwrap();

        let log = fs::read_to_string(project.join(crate::config::LOG_FILENAME)).unwrap();
        assert!(log.starts_with("### name\n"));
        assert!(!f.manager.log().path().unwrap().exists());
    }

    #[test]
    fn new_snippet_without_project_skips_the_log() {
        let mut f = fixture();
        let ctx = context(Some("x"), Some("go"));
        let mut prompts = Scripted::answering(&[Some("name"), Some("desc")]);

        NewSnippetWorkflow::new(&f.manager, &ctx)
            .run(&mut prompts, &mut f.notifier)
            .unwrap();

        assert!(f.manager.store().load("go").unwrap().contains_key("name"));
        assert!(!f.manager.log().path().unwrap().exists());
        assert_eq!(f.notifier.warns.len(), 1);
    }

    #[test]
    fn abandoning_any_prompt_changes_nothing() {
        for answers in [vec![None], vec![Some("name"), None]] {
            let mut f = fixture();
            let ctx = context(Some("x"), Some("go"));
            let mut prompts = Scripted::answering(&answers);

            let outcome = NewSnippetWorkflow::new(&f.manager, &ctx)
                .run(&mut prompts, &mut f.notifier)
                .unwrap();

            assert!(outcome.is_abandoned());
            assert!(f.manager.store().list_languages().unwrap().is_empty());
            assert!(!f.manager.log().path().unwrap().exists());
        }
    }

    #[test]
    fn new_snippet_without_selection_warns_and_stops() {
        let mut f = fixture();
        let ctx = context(None, Some("go"));
        let mut prompts = Scripted::default();

        let outcome = NewSnippetWorkflow::new(&f.manager, &ctx)
            .run(&mut prompts, &mut f.notifier)
            .unwrap();

        assert!(outcome.is_abandoned());
        assert!(prompts.asked.is_empty());
        assert_eq!(f.notifier.warns.len(), 1);
    }

    #[test]
    fn new_snippet_rejects_blank_answers() {
        let mut f = fixture();
        let ctx = context(Some("x"), Some("go"));

        let mut prompts = Scripted::answering(&[Some("")]);
        assert!(matches!(
            NewSnippetWorkflow::new(&f.manager, &ctx).run(&mut prompts, &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));

        let mut prompts = Scripted::answering(&[Some("name"), Some("  ")]);
        assert!(matches!(
            NewSnippetWorkflow::new(&f.manager, &ctx).run(&mut prompts, &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
    }

    #[test]
    fn new_snippet_requires_active_language() {
        let mut f = fixture();
        let ctx = context(Some("x"), None);
        let mut prompts = Scripted::default();

        assert!(matches!(
            NewSnippetWorkflow::new(&f.manager, &ctx).run(&mut prompts, &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
    }

    #[test]
    fn delete_picks_language_then_snippet() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "gone", "d", "go", &mut f.notifier)
            .unwrap();
        f.manager
            .create_from_selection("y", "stays", "d", "go", &mut f.notifier)
            .unwrap();
        let mut picker = Scripted::answering(&[Some("go"), Some("gone")]);

        let outcome = DeleteWorkflow::new(&f.manager)
            .run(&mut picker, &mut f.notifier)
            .unwrap();

        assert_eq!(outcome.completed().unwrap().prefix, "gone");
        let keys: Vec<_> = f.manager.store().load("go").unwrap().into_keys().collect();
        assert_eq!(keys, vec!["stays"]);
    }

    #[test]
    fn delete_for_known_language_only_picks_snippet() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "only", "d", "rust", &mut f.notifier)
            .unwrap();
        let mut picker = Scripted::answering(&[Some("only")]);

        let outcome = DeleteWorkflow::new(&f.manager)
            .for_language("rust")
            .run(&mut picker, &mut f.notifier)
            .unwrap();

        assert!(!outcome.is_abandoned());
        assert_eq!(picker.asked, vec!["Select a snippet to delete"]);
    }

    #[test]
    fn delete_for_unknown_language_is_not_found() {
        let mut f = fixture();
        let mut picker = Scripted::default();
        assert!(matches!(
            DeleteWorkflow::new(&f.manager)
                .for_language("cobol")
                .run(&mut picker, &mut f.notifier),
            Err(SnipvaultError::NotFound(_))
        ));
    }

    #[test]
    fn delete_without_snippets_is_not_found() {
        let mut f = fixture();
        let mut picker = Scripted::default();
        assert!(matches!(
            DeleteWorkflow::new(&f.manager).run(&mut picker, &mut f.notifier),
            Err(SnipvaultError::NotFound(_))
        ));
    }

    #[test]
    fn delete_abandoned_at_snippet_pick_keeps_everything() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "keep", "d", "go", &mut f.notifier)
            .unwrap();
        let mut picker = Scripted::answering(&[Some("go"), None]);

        let outcome = DeleteWorkflow::new(&f.manager)
            .run(&mut picker, &mut f.notifier)
            .unwrap();

        assert!(outcome.is_abandoned());
        assert_eq!(f.manager.store().load("go").unwrap().len(), 1);
    }

    #[test]
    fn import_reads_file_and_asks_language() {
        let mut f = fixture();
        let file = f.temp.path().join("incoming.json");
        fs::write(
            &file,
            r#"{"prefix": "hi", "body": ["hello"], "description": "greeting"}"#,
        )
        .unwrap();
        let ctx = context(None, None);
        let mut dialog = Dialog(Some(file));
        let mut prompts = Scripted::answering(&[Some("python")]);

        let outcome = ImportWorkflow::new(&f.manager, &ctx)
            .run(&mut dialog, &mut prompts, &mut f.notifier)
            .unwrap();

        assert_eq!(outcome, WorkflowOutcome::Completed(1));
        assert_eq!(prompts.asked, vec![LANGUAGE_PROMPT]);
        assert!(f.manager.store().load("python").unwrap().contains_key("hi"));
    }

    #[test]
    fn import_without_file_is_abandoned() {
        let mut f = fixture();
        let ctx = context(None, None);
        let mut dialog = Dialog(None);
        let mut prompts = Scripted::default();

        let outcome = ImportWorkflow::new(&f.manager, &ctx)
            .run(&mut dialog, &mut prompts, &mut f.notifier)
            .unwrap();

        assert!(outcome.is_abandoned());
        assert_eq!(f.notifier.warns, vec!["No file selected."]);
    }

    #[test]
    fn import_with_known_file_skips_dialog() {
        let mut f = fixture();
        let file = f.temp.path().join("many.json");
        fs::write(
            &file,
            r#"{"a": {"prefix": "a", "body": ["1"]}, "b": {"prefix": "b", "body": ["2"]}}"#,
        )
        .unwrap();
        let ctx = context(None, Some("rust"));
        let mut prompts = Scripted::answering(&[Some("rust")]);

        let outcome = ImportWorkflow::new(&f.manager, &ctx)
            .run_with_file(file, &mut prompts, &mut f.notifier)
            .unwrap();

        assert_eq!(outcome, WorkflowOutcome::Completed(2));
    }

    #[test]
    fn import_of_malformed_file_fails_before_prompting() {
        let mut f = fixture();
        let file = f.temp.path().join("bad.json");
        fs::write(&file, "not json").unwrap();
        let ctx = context(None, None);
        let mut prompts = Scripted::default();

        assert!(matches!(
            ImportWorkflow::new(&f.manager, &ctx).run_with_file(file, &mut prompts, &mut f.notifier),
            Err(SnipvaultError::Validation(_))
        ));
        assert!(prompts.asked.is_empty());
    }

    #[test]
    fn export_writes_to_chosen_destination() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "x", "d", "go", &mut f.notifier)
            .unwrap();
        let destination = f.temp.path().join("backup.json");
        let mut dialog = Dialog(Some(destination.clone()));

        let outcome = ExportWorkflow::new(&f.manager)
            .run(&mut dialog, &mut f.notifier)
            .unwrap();

        assert_eq!(outcome, WorkflowOutcome::Completed(destination.clone()));
        let written: Library =
            serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
        assert_eq!(written, f.manager.export_all().unwrap());
    }

    #[test]
    fn export_to_default_path_keeps_the_store_readable() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "x", "d", "go", &mut f.notifier)
            .unwrap();

        let outcome = ExportWorkflow::new(&f.manager)
            .run(&mut AcceptDefault, &mut f.notifier)
            .unwrap();

        let written = outcome.completed().unwrap();
        assert_eq!(written, f.manager.store().root().join(EXPORT_FILENAME));
        assert_eq!(f.manager.store().list_languages().unwrap(), vec!["go"]);
        let again = f.manager.export_all().unwrap();
        assert_eq!(again.keys().collect::<Vec<_>>(), vec!["go"]);
        assert_eq!(f.manager.list(None).unwrap(), again);
    }

    #[test]
    fn export_cancelled_writes_nothing() {
        let mut f = fixture();
        f.manager
            .create_from_selection("x", "x", "d", "go", &mut f.notifier)
            .unwrap();
        let mut dialog = Dialog(None);

        let outcome = ExportWorkflow::new(&f.manager)
            .run(&mut dialog, &mut f.notifier)
            .unwrap();

        assert!(outcome.is_abandoned());
        assert!(!f.manager.store().root().join(EXPORT_FILENAME).exists());
    }
}
