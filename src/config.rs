//! Session configuration resolved once at startup.

use std::path::PathBuf;
use std::sync::Arc;

use crate::azure::AzureBackend;
use crate::backend::{Backend, DemoBackend, QuerySpec};
use crate::cli::{BackendChoice, Cli};
use crate::error::{BacklogError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Demo,
    Azure { org: String, project: String, pat: String },
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: BackendConfig,
    /// Default user for the login screen and the `list` command.
    pub user: Option<String>,
    /// Filters applied to every query besides the user.
    pub query: QuerySpec,
    pub log_dir: PathBuf,
}

/// Treat empty or blank values like absent ones.
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Pick the backend from the requested choice and whatever credentials are set.
pub fn resolve_backend(
    choice: BackendChoice,
    org: Option<String>,
    project: Option<String>,
    pat: Option<String>,
) -> Result<BackendConfig> {
    match (choice, org, project, pat) {
        (BackendChoice::Demo, ..) => Ok(BackendConfig::Demo),
        (_, Some(org), Some(project), Some(pat)) => Ok(BackendConfig::Azure { org, project, pat }),
        (BackendChoice::Auto, ..) => Ok(BackendConfig::Demo),
        (BackendChoice::Azure, org, project, _) => Err(BacklogError::MissingCredential(if org.is_none() {
            "AZURE_ORG"
        } else if project.is_none() {
            "AZURE_PROJECT"
        } else {
            "AZURE_PAT"
        })),
    }
}

/// `$HOME/.wb/logs`, or a directory under the system temp dir without a home.
pub fn default_log_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(".wb").join("logs"),
        _ => std::env::temp_dir().join("wb").join("logs"),
    }
}

impl SessionConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let backend = resolve_backend(cli.backend, present(&cli.org), present(&cli.project), present(&cli.pat))?;
        Ok(SessionConfig {
            backend,
            user: present(&cli.user),
            query: QuerySpec {
                assignee: None,
                state: present(&cli.state),
                iteration: present(&cli.iteration),
                area: present(&cli.area),
            },
            log_dir: cli.log_dir.clone().unwrap_or_else(default_log_dir),
        })
    }

    /// Construct the configured backend.
    pub fn build_backend(&self) -> Result<Arc<dyn Backend>> {
        Ok(match &self.backend {
            BackendConfig::Demo => Arc::new(DemoBackend::new()),
            BackendConfig::Azure { org, project, pat } => Arc::new(AzureBackend::new(org, project, pat)?),
        })
    }
}
