//! Jira release versions and issue transitions.

/// REST client implementation.
pub mod client;

/// Wire types for the Jira REST API.
pub mod types;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{Result, forge::types::Lookup, jira::types::Version};

/// Operations the release flow needs from Jira.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Find the single release version with exactly this name. More than
    /// one match is an ambiguous-state error.
    async fn find_release_version(
        &self,
        project_key: &str,
        name: &str,
    ) -> Result<Lookup<Version>>;

    async fn create_release_version(
        &self,
        project_key: &str,
        name: &str,
        description: &str,
    ) -> Result<Version>;

    async fn attach_issue_to_version(
        &self,
        issue_key: &str,
        version_id: &str,
    ) -> Result<()>;

    /// Move an issue to the named status. An issue already in that status
    /// is left untouched.
    async fn transition_issue(&self, issue_key: &str, status: &str)
    -> Result<()>;
}
