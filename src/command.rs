//! Command execution for steward.
//!
//! Each command follows the same pattern:
//! 1. Resolve the requester, when `--email` is given, so the outcome can be
//!    sent to them on Slack
//! 2. Connect to GitHub and load `steward.toml` from the default branch
//! 3. Run the command workflow
//! 4. Report success or failure to the requester and the log

use log::*;

use crate::{Result, cli::Args, cli::Command};

/// Shared setup and outcome reporting.
pub mod common;

/// Label reconciliation on issues and pull requests.
pub mod label;

/// Syncing the release branch and release pull request.
pub mod release_pr;

/// Tagging merged release pull requests.
pub mod release;

/// Jira release versions for a release pull request.
pub mod jira_release;

/// Run the subcommand selected on the command line.
pub async fn execute(args: &Args) -> Result<()> {
    let ctx = common::CommandContext::from_args(args).await?;

    debug!(
        "running {:?} on {} (requester notified: {})",
        args.command,
        ctx.forge.repo_name(),
        ctx.reporter.has_requester()
    );

    match &args.command {
        Command::Label { number, labels } => {
            label::execute(&ctx, *number, labels).await
        }
        Command::ReleasePr { date } => release_pr::execute(&ctx, *date).await,
        Command::Release { number } => release::execute(&ctx, *number).await,
        Command::JiraRelease {
            number,
            version,
            name,
        } => jira_release::execute(&ctx, *number, version, name).await,
    }
}
