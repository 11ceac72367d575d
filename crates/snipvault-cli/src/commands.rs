use crate::cli::{Commands, Snipvault};
use crate::utils::{language_for_path, print_library, resolve_project_root, SelectionSource};
use snipvault_core::{
    ActiveContext, DeleteWorkflow, ExportWorkflow, ImportWorkflow, NewSnippetWorkflow, Notifier,
    Result, SnipvaultConfig, SnippetManager, WorkflowOutcome,
};
use snipvault_ui::{TerminalFileDialog, TerminalPicker, TerminalPrompt};
use std::env;
use std::path::PathBuf;

/// Everything a command needs, resolved once from the global options.
pub struct Session {
    pub config: SnipvaultConfig,
    pub project_root: Option<PathBuf>,
    pub manager: SnippetManager,
}

impl Session {
    pub fn new(snippets_dir: Option<PathBuf>, project: Option<PathBuf>, no_log: bool) -> Self {
        let config = match snippets_dir {
            Some(dir) => SnipvaultConfig::new(dir),
            None => SnipvaultConfig::from_env(),
        };
        let project_root = resolve_project_root(project, no_log);
        let manager = SnippetManager::from_config(&config, project_root.as_deref());
        Self {
            config,
            project_root,
            manager,
        }
    }

    fn context(
        &self,
        selected_text: Option<String>,
        language_id: Option<String>,
    ) -> ActiveContext {
        ActiveContext {
            selected_text,
            language_id,
            project_root: self.project_root.clone(),
        }
    }

    // Relative paths typed into the file dialog resolve against the project.
    fn dialog_base(&self) -> PathBuf {
        self.project_root
            .clone()
            .or_else(|| env::current_dir().ok())
            .unwrap_or_default()
    }
}

pub fn handle_command(args: Snipvault, notifier: &mut dyn Notifier) -> Result<()> {
    let session = Session::new(args.snippets_dir, args.project, args.no_log);
    handle_subcommand(&session, args.commands, notifier)
}

fn handle_subcommand(
    session: &Session,
    command: Commands,
    notifier: &mut dyn Notifier,
) -> Result<()> {
    let manager = &session.manager;
    match command {
        Commands::Add {
            prefix,
            description,
            language,
            text,
            clipboard,
        } => {
            let text = SelectionSource::pick(text, None, clipboard).read()?;
            manager
                .create_from_selection(&text, &prefix, &description, &language, notifier)
                .map(|_| ())
        }
        Commands::New {
            language,
            file,
            clipboard,
        } => {
            let language = language.or_else(|| {
                file.as_deref()
                    .and_then(language_for_path)
                    .map(str::to_string)
            });
            let text = SelectionSource::pick(None, file, clipboard).read()?;
            let context = session.context(Some(text), language);
            let outcome = NewSnippetWorkflow::new(manager, &context)
                .run(&mut TerminalPrompt::new(), notifier)?;
            report(outcome);
            Ok(())
        }
        Commands::Delete {
            language: Some(language),
            prefix: Some(prefix),
        } => manager.delete(&language, &prefix, notifier).map(|_| ()),
        Commands::Delete { language, .. } => {
            let mut workflow = DeleteWorkflow::new(manager);
            if let Some(language) = language {
                workflow = workflow.for_language(language);
            }
            report(workflow.run(&mut TerminalPicker::new(), notifier)?);
            Ok(())
        }
        Commands::Import {
            file: Some(file),
            language: Some(language),
        } => manager.import_file(&file, &language, notifier).map(|_| ()),
        Commands::Import { file, language } => {
            let context = session.context(None, language);
            let workflow = ImportWorkflow::new(manager, &context);
            let mut prompt = TerminalPrompt::new();
            let outcome = match file {
                Some(file) => workflow.run_with_file(file, &mut prompt, notifier)?,
                None => {
                    let mut dialog = TerminalFileDialog::new(session.dialog_base());
                    workflow.run(&mut dialog, &mut prompt, notifier)?
                }
            };
            report(outcome);
            Ok(())
        }
        Commands::Export {
            output: Some(output),
        } => manager.export_to(&output, notifier).map(|_| ()),
        Commands::Export { output: None } => {
            let mut dialog = TerminalFileDialog::new(session.dialog_base());
            report(ExportWorkflow::new(manager).run(&mut dialog, notifier)?);
            Ok(())
        }
        Commands::List { language } => {
            let library = manager.list(language.as_deref())?;
            print_library(&library, &session.config.snippets_dir);
            Ok(())
        }
    }
}

fn report<T>(outcome: WorkflowOutcome<T>) {
    if outcome.is_abandoned() {
        println!("Operation canceled.");
    }
}
