use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "snipvault - save, share and log reusable code snippets",
    long_about = "snipvault keeps one JSON snippet collection per language and mirrors \
                  every saved snippet into the project's SavedSnippets.md."
)]
pub struct Snipvault {
    #[clap(
        long,
        global = true,
        help = "Directory holding the <language>.json collections"
    )]
    pub snippets_dir: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        help = "Project root for SavedSnippets.md (defaults to the current directory)"
    )]
    pub project: Option<PathBuf>,

    #[clap(long, global = true, help = "Do not touch SavedSnippets.md")]
    pub no_log: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a snippet without prompting
    Add {
        #[clap(long, short = 'p', help = "Prefix that triggers the snippet")]
        prefix: String,

        #[clap(long, short = 'd', help = "What the snippet is for")]
        description: String,

        #[clap(long, short = 'l', help = "Language id, e.g. javascript")]
        language: String,

        #[clap(
            long,
            short = 't',
            conflicts_with = "clipboard",
            help = "Snippet text (read from stdin when omitted)"
        )]
        text: Option<String>,

        #[clap(long, help = "Take the snippet text from the clipboard")]
        clipboard: bool,
    },
    /// Create a snippet interactively from a file, the clipboard or stdin
    New {
        #[clap(long, short = 'l', help = "Language id (guessed from --file when omitted)")]
        language: Option<String>,

        #[clap(
            long,
            short = 'f',
            conflicts_with = "clipboard",
            help = "Use the contents of this file as the selection"
        )]
        file: Option<PathBuf>,

        #[clap(long, help = "Use the clipboard as the selection")]
        clipboard: bool,
    },
    /// Delete a snippet, picking it from a list unless both options are given
    Delete {
        #[clap(long, short = 'l', help = "Language of the snippet")]
        language: Option<String>,

        #[clap(long, short = 'p', help = "Prefix of the snippet to delete")]
        prefix: Option<String>,
    },
    /// Import snippets from a JSON file
    Import {
        #[clap(help = "File to import (asked for when omitted)")]
        file: Option<PathBuf>,

        #[clap(long, short = 'l', help = "Language to import into (asked for when omitted)")]
        language: Option<String>,
    },
    /// Export every collection into one JSON file
    Export {
        #[clap(long, short = 'o', help = "Destination file (asked for when omitted)")]
        output: Option<PathBuf>,
    },
    /// List saved snippets
    List {
        #[clap(long, short = 'l', help = "Only show this language")]
        language: Option<String>,
    },
}
