//! CLI argument parsing and service connection settings.
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::env;

use crate::{
    Result, error::StewardError, forge::config::RemoteConfig,
    jira::client::JiraConnection,
};

/// Global CLI arguments for service connections and debugging.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub repository URL (https://github.com/owner/repo).
    pub github_repo: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, global = true)]
    /// Email or display name of the person who triggered the command.
    /// They are messaged on Slack with the outcome.
    pub email: Option<String>,

    #[arg(long, default_value = "", global = true)]
    /// Jira instance URL. Falls back to JIRA_BASE_URL env var.
    pub jira_url: String,

    #[arg(long, default_value = "", global = true)]
    /// Jira account email. Falls back to JIRA_EMAIL env var.
    pub jira_email: String,

    #[arg(long, default_value = "", global = true)]
    /// Jira API token. Falls back to JIRA_API_TOKEN env var.
    pub jira_token: String,

    #[arg(long, default_value = "", global = true)]
    /// Slack bot token. Falls back to SLACK_TOKEN env var.
    pub slack_token: String,

    #[arg(long, default_value = "", global = true)]
    /// Credential service URL. Falls back to CREDENTIALS_URL env var.
    pub credentials_url: String,

    #[arg(long, default_value = "", global = true)]
    /// Credential service token. Falls back to CREDENTIALS_TOKEN env var.
    pub credentials_token: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Repository automation subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add labels to an issue or pull request, removing labels that are
    /// mutually exclusive with them.
    Label {
        /// Issue or pull request number.
        #[arg(long)]
        number: u64,

        /// Label to add. Repeat to add several.
        #[arg(long = "add", required = true)]
        labels: Vec<String>,
    },

    /// Sync the release branch and open or update the release pull request.
    ReleasePr {
        /// Date stamped into the release title. Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Tag a merged release pull request and mirror it into Jira.
    Release {
        /// Release pull request number.
        #[arg(long)]
        number: u64,
    },

    /// Create the Jira release version for a release pull request and move
    /// its issues to done.
    JiraRelease {
        /// Release pull request number.
        #[arg(long)]
        number: u64,

        /// Release version, e.g. 2026.10.17.
        #[arg(long)]
        version: String,

        /// Release name, e.g. "Brave Badger".
        #[arg(long)]
        name: String,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::ReleasePr { date: None }
    }
}

/// Flag value, or the named environment variable when the flag is empty.
fn flag_or_env(flag: &str, var: &str) -> String {
    if !flag.is_empty() {
        return flag.to_string();
    }

    env::var(var).unwrap_or_default()
}

impl Args {
    /// Configure the GitHub connection from CLI arguments.
    pub fn github_remote(&self) -> Result<RemoteConfig> {
        if self.github_repo.is_empty() {
            return Err(StewardError::InvalidArgs(
                "must set --github-repo".into(),
            ));
        }

        let token = flag_or_env(&self.github_token, "GITHUB_TOKEN");

        if token.is_empty() {
            return Err(StewardError::InvalidArgs(
                "must set github token".into(),
            ));
        }

        RemoteConfig::from_repo_url(&self.github_repo, SecretString::from(token))
    }

    /// Jira connection, when a Jira URL is configured.
    pub fn jira_connection(&self) -> Result<Option<JiraConnection>> {
        let base_url = flag_or_env(&self.jira_url, "JIRA_BASE_URL");

        if base_url.is_empty() {
            return Ok(None);
        }

        let email = flag_or_env(&self.jira_email, "JIRA_EMAIL");
        let token = flag_or_env(&self.jira_token, "JIRA_API_TOKEN");

        if email.is_empty() || token.is_empty() {
            return Err(StewardError::InvalidArgs(
                "jira url is set but jira email or api token is missing".into(),
            ));
        }

        Ok(Some(JiraConnection {
            base_url,
            email,
            token: SecretString::from(token),
        }))
    }

    pub fn slack_token(&self) -> Option<SecretString> {
        let token = flag_or_env(&self.slack_token, "SLACK_TOKEN");
        (!token.is_empty()).then(|| SecretString::from(token))
    }

    /// Credential service URL and token, when configured.
    pub fn credentials_service(&self) -> Option<(String, SecretString)> {
        let url = flag_or_env(&self.credentials_url, "CREDENTIALS_URL");
        let token = flag_or_env(&self.credentials_token, "CREDENTIALS_TOKEN");

        if url.is_empty() || token.is_empty() {
            return None;
        }

        Some((url, SecretString::from(token)))
    }
}
