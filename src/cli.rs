use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::cmd::Commands;

/// Which work item source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// Azure DevOps when organization, project and token are all set, demo data otherwise.
    Auto,
    /// Built-in demo data set.
    Demo,
    /// Azure DevOps; fails when a credential is missing.
    Azure,
}

/// Terminal backlog browser.
/// Connection settings fall back to AZURE_ORG, AZURE_PROJECT, AZURE_PAT and AZURE_USER.
#[derive(Parser)]
#[command(name = "wb", version, about = "Browse and edit your work item backlog from the terminal")]
pub struct Cli {
    /// Work item source.
    #[arg(long, global = true, value_enum, default_value_t = BackendChoice::Auto)]
    pub backend: BackendChoice,

    /// Azure DevOps organization.
    #[arg(long, global = true, env = "AZURE_ORG")]
    pub org: Option<String>,

    /// Azure DevOps project.
    #[arg(long, global = true, env = "AZURE_PROJECT")]
    pub project: Option<String>,

    /// Personal access token.
    #[arg(long, global = true, env = "AZURE_PAT", hide_env_values = true)]
    pub pat: Option<String>,

    /// User whose items are listed; pre-fills the login screen.
    #[arg(long, global = true, env = "AZURE_USER")]
    pub user: Option<String>,

    /// Only items in this state.
    #[arg(long, global = true)]
    pub state: Option<String>,

    /// Only items under this iteration path.
    #[arg(long, global = true)]
    pub iteration: Option<String>,

    /// Only items under this area path.
    #[arg(long, global = true)]
    pub area: Option<String>,

    /// Directory for log files. Defaults to ~/.wb/logs.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["wb", "list", "--backend", "demo", "--user", "john", "--json"]).unwrap();
        assert_eq!(cli.backend, BackendChoice::Demo);
        assert_eq!(cli.user.as_deref(), Some("john"));
        assert!(matches!(cli.command, Some(Commands::List { json: true })));
    }

    #[test]
    fn no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["wb", "--backend", "demo"]).unwrap();
        assert!(cli.command.is_none());
    }
}
