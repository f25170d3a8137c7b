//! # wb - Work Backlog
//!
//! A terminal browser for the work items assigned to you, with an editable
//! detail view built from a small composable form toolkit.
//!
//! ## Key Features
//!
//! - **Backlog Table**: Every initiative, requirement, story, task and bug assigned to a user
//! - **Detail Form**: Focus-managed fields (selectors, read-only rows, tabbed text areas)
//! - **Full-Screen Editor**: Rewrite a description without leaving the terminal
//! - **Pluggable Backends**: Azure DevOps over REST, or a built-in demo data set
//! - **Scriptable Listing**: `wb list` prints the same query as boxed text or JSON
//!
//! ## Quick Start
//!
//! ```bash
//! # Browse the demo data set
//! wb --backend demo
//!
//! # Browse Azure DevOps (credentials may also come from the environment)
//! AZURE_ORG=contoso AZURE_PROJECT=web AZURE_PAT=... wb --user john
//!
//! # Print items for scripting
//! wb list --user sarah --json
//! ```
//!
//! ## Key Bindings
//!
//! - Backlog: `j`/`k` move, `enter` opens, `r` refreshes, `esc` logs out, `q` quits
//! - Detail: `j`/`k` move focus, `enter` edits a field, `e` opens the editor, `esc` goes back
//! - Editor: `ctrl+s` saves, `esc` discards
//!
//! Logs are written to `~/.wb/logs/` and honour `RUST_LOG`.

use clap::Parser;

pub mod azure;
pub mod backend;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod work_item;
pub mod tui {
    pub mod app;
    pub mod backlog;
    pub mod colors;
    pub mod detail;
    pub mod enums;
    pub mod field;
    pub mod form;
    pub mod input;
    pub mod login;
    pub mod run;
    pub mod screen;
    pub mod session;
    pub mod tabs;
    pub mod text_area;
    pub mod text_field;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::SessionConfig;

fn main() {
    let cli = Cli::parse();

    let config = match SessionConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Held for the whole run so buffered log records are flushed on exit.
    let _logging = logging::init(&config.log_dir);

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(&config),
        Commands::List { json } => cmd_list(&config, json),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
