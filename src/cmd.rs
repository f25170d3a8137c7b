//! Command implementations for the CLI interface.
//!
//! The default command opens the terminal UI; `list` prints the same query
//! result as plain text or JSON for scripting.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::backend::QuerySpec;
use crate::config::SessionConfig;
use crate::tui::run::run_tui;
use crate::work_item::{format_date, format_tags, truncate, WorkItem};

/// Longest description excerpt printed by `list`.
const DESCRIPTION_EXCERPT: usize = 100;
const BOX_WIDTH: usize = 60;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface (default).
    Ui,

    /// Print the work items assigned to a user.
    List {
        /// Emit JSON instead of boxed summaries.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &SessionConfig) {
    let backend = match config.build_backend() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Backend error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run_tui(config, backend) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Query the backend once and print the result.
pub fn cmd_list(config: &SessionConfig, json: bool) {
    let Some(user) = config.user.as_deref() else {
        eprintln!("No user given. Pass --user or set AZURE_USER.");
        std::process::exit(1);
    };

    let backend = match config.build_backend() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Backend error: {e}");
            std::process::exit(1);
        }
    };

    let spec = QuerySpec {
        assignee: Some(user.to_string()),
        ..config.query.clone()
    };
    tracing::info!(backend = backend.name(), user, "listing work items");

    let items = match backend.query(&spec) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Failed to fetch work items: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&items) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to serialise work items: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if items.is_empty() {
        println!("No work items found for {user}.");
        return;
    }

    println!("Found {} work item(s) for {user}:\n", items.len());
    for item in &items {
        println!("{}", format_work_item(item));
    }
}

/// Boxed plain-text summary of one work item.
pub fn format_work_item(item: &WorkItem) -> String {
    let header = format!("┌─ Work Item #{} ", item.id);
    let fill = BOX_WIDTH.saturating_sub(header.chars().count());
    let description = truncate(&item.description.replace('\n', " "), DESCRIPTION_EXCERPT);

    let rows = [
        ("Type", item.kind.to_string()),
        ("Title", item.title.clone()),
        ("Assigned To", item.assignee_label().to_string()),
        ("State", item.state.clone()),
        ("Priority", item.priority.to_string()),
        ("Area Path", item.area_path.clone()),
        ("Iteration", item.iteration_path.clone()),
        ("Created By", item.created_by.clone()),
        ("Created", format_date(&item.created_at)),
        ("Tags", format_tags(&item.tags)),
        ("Description", description),
    ];

    let mut out = format!("{header}{}\n", "─".repeat(fill));
    for (label, value) in rows {
        out.push_str(&format!("│ {:<13}{value}\n", format!("{label}:")));
    }
    out.push_str(&format!("└{}\n", "─".repeat(BOX_WIDTH - 1)));
    out
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
