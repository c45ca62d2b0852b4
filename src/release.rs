//! Release branch, release pull request, tag and Jira lifecycle.
//!
//! The release branch tracks the tip of the source branch. Whenever it is
//! synced, release notes are regenerated from the commits that the target
//! branch does not have yet, and a single open release pull request is
//! created or updated with them. Once that pull request is merged the
//! release is tagged on GitHub and mirrored into Jira fix versions.
//!
//! Nothing is cached between calls: branch tips, the open pull request and
//! label sets are read from GitHub right before they are changed.

pub mod branch;
pub mod jira;
pub mod name;
pub mod notes;
pub mod pull_request;

use chrono::NaiveDate;
use derive_builder::Builder;
use log::*;
use std::sync::Arc;

use crate::{
    Result,
    config::Config,
    error::StewardError,
    forge::{
        traits::Forge,
        types::{
            Branch, Comparison, CreateReleaseRequest, GetPrRequest, Lookup,
            PullRequest, Release,
        },
    },
    jira::IssueTracker,
    labels::LabelReconciler,
    release::{
        jira::{JiraReleaseRequest, ProjectRelease},
        name::{ReleaseNameGenerator, ReleaseTitle},
        notes::ReleaseNotesBuilder,
    },
};

/// Collaborators and configuration for a [`ReleaseLifecycleManager`].
#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct ReleaseManagerParams {
    forge: Arc<dyn Forge>,
    #[builder(default)]
    tracker: Option<Arc<dyn IssueTracker>>,
    #[builder(default)]
    config: Config,
}

impl ReleaseManagerParams {
    pub fn builder() -> ReleaseManagerParamsBuilder {
        ReleaseManagerParamsBuilder::default()
    }
}

/// Result of syncing the pending release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRelease {
    pub branch: Branch,
    pub title: ReleaseTitle,
    pub pull_request: PullRequest,
}

/// Result of publishing a merged release pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub release: Release,
    pub title: ReleaseTitle,
    pub projects: Vec<ProjectRelease>,
}

pub struct ReleaseLifecycleManager {
    forge: Arc<dyn Forge>,
    tracker: Option<Arc<dyn IssueTracker>>,
    config: Config,
    labels: LabelReconciler,
    notes: ReleaseNotesBuilder,
}

impl ReleaseLifecycleManager {
    pub fn new(params: ReleaseManagerParams) -> Result<Self> {
        let notes = ReleaseNotesBuilder::from_config(&params.config.release)?;
        let labels =
            LabelReconciler::new(params.config.labels.exclusion_groups.clone());

        Ok(Self {
            forge: params.forge,
            tracker: params.tracker,
            config: params.config,
            labels,
            notes,
        })
    }

    /// Create, keep or recreate the release branch so it points at
    /// `source_sha`.
    pub async fn ensure_release_branch(&self, source_sha: &str) -> Result<Branch> {
        branch::ensure_release_branch(
            self.forge.as_ref(),
            &self.config.release.release_branch,
            source_sha,
        )
        .await
    }

    pub async fn compute_release_notes(
        &self,
        title: &ReleaseTitle,
        comparison: &Comparison,
    ) -> Result<String> {
        self.notes
            .compute_release_notes(self.forge.as_ref(), title, comparison)
            .await
    }

    pub async fn ensure_release_pull_request(
        &self,
        title: &ReleaseTitle,
        body: &str,
    ) -> Result<PullRequest> {
        pull_request::ensure_release_pull_request(
            self.forge.as_ref(),
            &self.config.release.release_branch,
            &self.config.release.target_branch,
            title,
            body,
        )
        .await
    }

    /// Name of the pending release, taken from the open release pull
    /// request's title.
    ///
    /// Must be read before the release branch is synced: recreating the
    /// branch closes the pull request that has it as head.
    async fn open_release_name(&self) -> Result<Option<String>> {
        let existing = self
            .forge
            .find_open_pull_request(GetPrRequest {
                head_branch: self.config.release.release_branch.clone(),
                base_branch: self.config.release.target_branch.clone(),
            })
            .await?;

        if let Lookup::Found(pr) = existing
            && let Some(title) = ReleaseTitle::parse(&pr.title)
        {
            debug!("keeping release name '{}' from #{}", title.name, pr.number);
            return Ok(Some(title.name));
        }

        Ok(None)
    }

    /// Sync the release branch to the source branch and open or update the
    /// release pull request. Returns `None` when the target branch already
    /// contains every source commit.
    pub async fn prepare_release(
        &self,
        as_of: NaiveDate,
    ) -> Result<Option<PreparedRelease>> {
        let release = &self.config.release;

        let source = match self.forge.get_branch(&release.source_branch).await? {
            Lookup::Found(branch) => branch,
            Lookup::NotFound => {
                return Err(StewardError::precondition(format!(
                    "source branch {} not found in {}",
                    release.source_branch,
                    self.forge.repo_name()
                )));
            }
        };

        let open_name = self.open_release_name().await?;
        let branch = self.ensure_release_branch(&source.sha).await?;

        let comparison = self
            .forge
            .compare_commits(&release.target_branch, &branch.sha)
            .await?;

        if comparison.commits.is_empty() {
            info!(
                "{} already contains every commit from {}: nothing to release",
                release.target_branch, release.source_branch
            );
            return Ok(None);
        }

        let name = match open_name {
            Some(name) => name,
            None => ReleaseNameGenerator::default().generate(&mut rand::thread_rng())?,
        };

        let title = ReleaseTitle::new(as_of, name);
        let notes = self.compute_release_notes(&title, &comparison).await?;
        let pull_request = self.ensure_release_pull_request(&title, &notes).await?;

        if !release.pr_labels.is_empty() {
            self.labels
                .add_labels(
                    self.forge.as_ref(),
                    pull_request.number,
                    &release.pr_labels,
                )
                .await?;
        }

        Ok(Some(PreparedRelease {
            branch,
            title,
            pull_request,
        }))
    }

    /// Tag a merged release pull request and mirror it into Jira. Pull
    /// requests that are still open or are not release pull requests are
    /// ignored.
    pub async fn publish_release(
        &self,
        pr_number: u64,
    ) -> Result<Option<PublishedRelease>> {
        let release = &self.config.release;

        let pr = match self.forge.get_pull_request(pr_number).await? {
            Lookup::Found(pr) => pr,
            Lookup::NotFound => {
                return Err(StewardError::not_found(format!(
                    "pull request #{pr_number} in {}",
                    self.forge.repo_name()
                )));
            }
        };

        if pr.head_branch != release.release_branch
            || pr.base_branch != release.target_branch
        {
            info!(
                "#{pr_number} merges {} into {}, not a release pr: ignoring",
                pr.head_branch, pr.base_branch
            );
            return Ok(None);
        }

        if !pr.merged {
            info!("release pr #{pr_number} is not merged yet: nothing to publish");
            return Ok(None);
        }

        let title = ReleaseTitle::parse(&pr.title).ok_or_else(|| {
            StewardError::precondition(format!(
                "release pr #{pr_number} title '{}' does not carry a release date and name",
                pr.title
            ))
        })?;

        let sha = pr.merge_commit_sha.clone().ok_or_else(|| {
            StewardError::precondition(format!(
                "release pr #{pr_number} has no merge commit"
            ))
        })?;

        let tag = format!("{}{}", release.tag_prefix, title.version());

        info!("tagging {tag} at {sha}");

        let published = self
            .forge
            .create_release(CreateReleaseRequest {
                tag,
                name: title.full_release_name(),
                sha,
                notes: pr.body.clone(),
            })
            .await?;

        let projects = if self.tracker.is_some() {
            self.create_release(pr_number, &title.version(), &title.name)
                .await?
        } else {
            debug!("no jira connection configured: skipping jira release");
            vec![]
        };

        Ok(Some(PublishedRelease {
            release: published,
            title,
            projects,
        }))
    }

    /// Create or reuse the Jira version `"{version} ({name})"` in every
    /// project referenced by the release pull request's commits, attach the
    /// referenced issues and move them to the done status.
    ///
    /// Every project runs to completion. Failed projects are collected into
    /// a single [`StewardError::JiraReleaseFailed`].
    pub async fn create_release(
        &self,
        pr_number: u64,
        release_version: &str,
        release_name: &str,
    ) -> Result<Vec<ProjectRelease>> {
        let tracker = self.tracker.as_ref().ok_or_else(|| {
            StewardError::precondition("no jira connection configured")
        })?;

        let repo = self.forge.repo_name();

        if let Lookup::NotFound = self.forge.get_pull_request(pr_number).await? {
            return Err(StewardError::not_found(format!(
                "release pull request #{pr_number} in {repo}"
            )));
        }

        let commits = self
            .forge
            .get_pull_request_commits(pr_number)
            .await
            .inspect_err(|err| {
                error!("failed to load commits for #{pr_number} in {repo}: {err}")
            })?;

        let version_name = format!("{release_version} ({release_name})");
        let description = format!("Released from {repo} #{pr_number}");

        let results = jira::release_projects(
            tracker.as_ref(),
            &commits,
            &JiraReleaseRequest {
                version_name: &version_name,
                description: &description,
                done_status: &self.config.jira.done_status,
                default_project: self.config.jira.default_project.as_deref(),
            },
        )
        .await?;

        let mut released = vec![];
        let mut failures = vec![];

        for (project, result) in results {
            match result {
                Ok(project_release) => released.push(project_release),
                Err(err) => {
                    warn!("jira release {version_name} failed for {project}: {err}");
                    failures.push(format!("{project}: {err}"));
                }
            }
        }

        if !failures.is_empty() {
            return Err(StewardError::JiraReleaseFailed {
                version: version_name,
                failures,
            });
        }

        Ok(released)
    }
}
