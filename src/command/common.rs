//! Common functionality shared between commands
use log::*;
use std::sync::Arc;

use crate::{
    Result,
    cli::Args,
    config::Config,
    credentials::{CredentialClient, CredentialService},
    error::StewardError,
    forge::{github::Github, traits::Forge},
    jira::{IssueTracker, client::JiraClient},
    release::{ReleaseLifecycleManager, ReleaseManagerParams},
    report::Reporter,
    slack::{Notifier, client::SlackClient},
};

/// Connected services and configuration for one command run.
pub struct CommandContext {
    pub forge: Arc<dyn Forge>,
    pub config: Config,
    pub tracker: Option<Arc<dyn IssueTracker>>,
    pub reporter: Reporter,
}

impl CommandContext {
    /// Resolve the requester first so a failure to connect or to load
    /// `steward.toml` still reaches them.
    pub async fn from_args(args: &Args) -> Result<Self> {
        let reporter = requester_reporter(args).await?;
        let connected = Self::connect(args, reporter.clone()).await;

        report_failure(&reporter, "Setup", connected).await
    }

    async fn connect(args: &Args, reporter: Reporter) -> Result<Self> {
        let remote = args.github_remote()?;
        let forge: Arc<dyn Forge> = Arc::new(Github::new(remote).await?);
        let config = Config::load(forge.as_ref()).await?;

        let tracker = match args.jira_connection()? {
            Some(connection) => {
                let client: Arc<dyn IssueTracker> =
                    Arc::new(JiraClient::new(connection)?);
                Some(client)
            }
            None => None,
        };

        Ok(Self {
            forge,
            config,
            tracker,
            reporter,
        })
    }

    pub fn release_manager(&self) -> Result<ReleaseLifecycleManager> {
        ReleaseLifecycleManager::new(
            ReleaseManagerParams::builder()
                .forge(Arc::clone(&self.forge))
                .tracker(self.tracker.clone())
                .config(self.config.clone())
                .build()?,
        )
    }
}

async fn requester_reporter(args: &Args) -> Result<Reporter> {
    let notifier = match args.slack_token() {
        Some(token) => {
            let client: Arc<dyn Notifier> = Arc::new(SlackClient::new(token)?);
            Some(client)
        }
        None => None,
    };

    let credentials = match args.credentials_service() {
        Some((url, token)) => Some(CredentialClient::new(&url, token)?),
        None => None,
    };

    resolve_reporter(
        args.email.as_deref(),
        credentials.as_ref().map(|c| c as &dyn CredentialService),
        notifier,
    )
    .await
}

/// Build the reporter for the person who triggered the command.
///
/// Without an email the reporter only logs. With one, the credential
/// service must resolve it to a Slack user; failing to do so stops the
/// command before anything is changed.
pub async fn resolve_reporter(
    email: Option<&str>,
    credentials: Option<&dyn CredentialService>,
    notifier: Option<Arc<dyn Notifier>>,
) -> Result<Reporter> {
    let Some(email) = email else {
        return Ok(Reporter::log_only());
    };

    let (Some(credentials), Some(notifier)) = (credentials, notifier) else {
        return Err(StewardError::InvalidArgs(
            "--email requires a credential service and a slack token".into(),
        ));
    };

    let user = credentials
        .fetch_user_credentials(email)
        .await
        .inspect_err(|err| {
            error!("failed to resolve credentials for {email}: {err}")
        })?;

    debug!("reporting to slack user {} for {email}", user.slack_user_id);

    Ok(Reporter::new(notifier, user.slack_user_id))
}

/// Report a failed `action` to the requester and pass the result through.
pub async fn report_failure<T>(
    reporter: &Reporter,
    action: &str,
    result: Result<T>,
) -> Result<T> {
    if let Err(err) = &result {
        reporter.report_error(&format!("{action} failed: {err}")).await;
    }

    result
}

/// Report the outcome of a command to the requester and pass it through.
pub async fn report_outcome<T>(
    reporter: &Reporter,
    action: &str,
    result: Result<T>,
    describe: impl FnOnce(&T) -> String,
) -> Result<T> {
    match result {
        Ok(value) => {
            reporter.report_info(&describe(&value)).await;
            Ok(value)
        }
        Err(err) => report_failure(reporter, action, Err(err)).await,
    }
}
