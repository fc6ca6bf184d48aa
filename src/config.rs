//! Process configuration, read from the environment exactly once at startup
//! and passed by value from there on.

use thiserror::Error;

use crate::gateway::CommitAuthor;

/// Owner of the synced repositories when no override is given.
pub const DEFAULT_REPOSITORY_OWNER: &str = "mozilla-mobile";

/// Default commit author identity.
pub const DEFAULT_AUTHOR_NAME: &str = "strsync-bot";
pub const DEFAULT_AUTHOR_EMAIL: &str = "strsync-bot@users.noreply.github.com";

/// Configuration error. Reported on standard output before exit, since it
/// happens before logging is useful.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No GITHUB_TOKEN set")]
    MissingToken,
}

/// Everything the process reads from its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub API token. Required.
    pub github_token: String,
    /// Raise console logging to debug level.
    pub debug: bool,
    /// Compute and report the change set without writing anything.
    pub dry_run: bool,
    /// Owner of the repositories to sync.
    pub repository_owner: String,
    /// Identity the sync commits are attributed to.
    pub author: CommitAuthor,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// Split out from [`Config::from_env`] so tests don't have to mutate
    /// process-global environment state.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let github_token = var("GITHUB_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let debug = var("DEBUG").is_some();
        let dry_run = var("DRY_RUN").is_some_and(|v| is_truthy(&v));

        let repository_owner =
            var("GITHUB_REPOSITORY_OWNER").unwrap_or_else(|| DEFAULT_REPOSITORY_OWNER.to_string());

        let author = CommitAuthor::new(
            var("AUTHOR_NAME").unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
            var("AUTHOR_EMAIL").unwrap_or_else(|| DEFAULT_AUTHOR_EMAIL.to_string()),
        );

        Ok(Config {
            github_token,
            debug,
            dry_run,
            repository_owner,
            author,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "True")
}
