//! Process configuration.
//!
//! Built once at startup from the environment, then passed by reference into
//! every component constructor. Nothing reads the environment after startup
//! and there are no ambient globals; credentials never appear in source.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Hosting provider credentials and workspace.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub username: String,
    pub app_password: String,
    pub workspace: String,
    /// API base URL; overridable for tests against a local stub.
    pub api_base: String,
}

/// Chat transport credentials.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub bot_token: String,
    pub channel: String,
    pub api_base: String,
}

/// Ticketing system credentials.
#[derive(Debug, Clone)]
pub struct TicketingConfig {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
}

/// Full process configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root under which `.repowatch/` state, mirrors, and results live.
    pub home: PathBuf,
    pub provider: ProviderConfig,
    pub chat: ChatConfig,
    pub ticketing: TicketingConfig,
    /// Path to the repository→project-key mapping document.
    pub project_keys_path: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Required: `BITBUCKET_USERNAME`, `BITBUCKET_APP_PASSWORD`,
    /// `BITBUCKET_WORKSPACE`, `JIRA_BASE_URL`, `JIRA_EMAIL`,
    /// `JIRA_API_TOKEN`, `SLACK_BOT_TOKEN`, `SLACK_CHANNEL`.
    /// Optional: `REPOWATCH_HOME` (defaults to the user home directory),
    /// `REPOWATCH_PROJECT_KEYS` (defaults to
    /// `<home>/.repowatch/project_keys.json`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = state_home()?;
        let project_keys_path = match env::var("REPOWATCH_PROJECT_KEYS") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => home.join(".repowatch").join("project_keys.json"),
        };

        Ok(Config {
            provider: ProviderConfig {
                username: require("BITBUCKET_USERNAME")?,
                app_password: require("BITBUCKET_APP_PASSWORD")?,
                workspace: require("BITBUCKET_WORKSPACE")?,
                api_base: "https://api.bitbucket.org/2.0".to_string(),
            },
            chat: ChatConfig {
                bot_token: require("SLACK_BOT_TOKEN")?,
                channel: require("SLACK_CHANNEL")?,
                api_base: "https://slack.com/api".to_string(),
            },
            ticketing: TicketingConfig {
                base_url: require("JIRA_BASE_URL")?,
                email: require("JIRA_EMAIL")?,
                api_token: require("JIRA_API_TOKEN")?,
            },
            home,
            project_keys_path,
        })
    }

    /// `<home>/.repowatch/mirrors/` — where local working copies live.
    pub fn mirror_root(&self) -> PathBuf {
        mirror_root_at(&self.home)
    }

    /// `<home>/.repowatch/results/` — where scan result artifacts are written.
    pub fn results_dir(&self) -> PathBuf {
        self.home.join(".repowatch").join("results")
    }
}

/// `<home>/.repowatch/mirrors/` — pure, no I/O.
pub fn mirror_root_at(home: &Path) -> PathBuf {
    home.join(".repowatch").join("mirrors")
}

/// Resolve the repowatch home: `REPOWATCH_HOME` if set, else the user home.
///
/// Commands that only read local state (`status`) use this without building a
/// full [`Config`].
pub fn state_home() -> Result<PathBuf, ConfigError> {
    if let Ok(home) = env::var("REPOWATCH_HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir().ok_or(ConfigError::NoHome)
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
