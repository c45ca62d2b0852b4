//! Cross-references a merged release with Jira fix versions.
use futures::future::join_all;
use log::*;
use regex::Regex;
use std::collections::BTreeMap;

use crate::{
    Result,
    error::StewardError,
    forge::types::{Commit, Lookup},
    jira::{IssueTracker, types::Version},
};

const ISSUE_KEY_PATTERN: &str = r"\[(?<key>[A-Z][A-Z0-9_]*-\d+)\]";

/// Work completed for one Jira project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRelease {
    pub project: String,
    pub version: Version,
    pub issues: Vec<String>,
}

/// Unique issue keys referenced as `[KEY-123]` in commit subjects, in the
/// order they were first seen.
pub fn extract_issue_keys(commits: &[Commit]) -> Result<Vec<String>> {
    let key_re = Regex::new(ISSUE_KEY_PATTERN)?;
    let mut keys: Vec<String> = vec![];

    for commit in commits {
        for captures in key_re.captures_iter(commit.first_line()) {
            let key = &captures["key"];
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }

    Ok(keys)
}

/// Group issue keys by the project prefix before the hyphen.
pub fn group_by_project(keys: &[String]) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for key in keys {
        if let Some((project, _)) = key.split_once('-') {
            groups
                .entry(project.to_string())
                .or_default()
                .push(key.clone());
        }
    }

    groups
}

async fn find_or_create_version(
    tracker: &dyn IssueTracker,
    project: &str,
    name: &str,
    description: &str,
) -> Result<Version> {
    match tracker.find_release_version(project, name).await? {
        Lookup::Found(version) => {
            info!("reusing jira version '{name}' ({}) in {project}", version.id);
            Ok(version)
        }
        Lookup::NotFound => {
            tracker
                .create_release_version(project, name, description)
                .await
        }
    }
}

/// Release one project: find or create the version, then attach and
/// transition each issue.
async fn release_project(
    tracker: &dyn IssueTracker,
    project: String,
    issues: Vec<String>,
    version_name: &str,
    description: &str,
    done_status: &str,
) -> Result<ProjectRelease> {
    let version =
        find_or_create_version(tracker, &project, version_name, description)
            .await?;

    for issue in issues.iter() {
        tracker.attach_issue_to_version(issue, &version.id).await?;
        tracker.transition_issue(issue, done_status).await?;
    }

    info!(
        "released {} issue(s) in {project} under '{version_name}'",
        issues.len()
    );

    Ok(ProjectRelease {
        project,
        version,
        issues,
    })
}

/// Settings for one Jira cross-reference run.
#[derive(Debug, Clone)]
pub struct JiraReleaseRequest<'a> {
    pub version_name: &'a str,
    pub description: &'a str,
    pub done_status: &'a str,
    pub default_project: Option<&'a str>,
}

/// Release every project referenced by `commits` concurrently.
///
/// Each project runs independently: a failure in one project never stops
/// or rolls back another. All projects run to completion before the
/// per-project results are returned.
pub async fn release_projects(
    tracker: &dyn IssueTracker,
    commits: &[Commit],
    req: &JiraReleaseRequest<'_>,
) -> Result<Vec<(String, Result<ProjectRelease>)>> {
    let keys = extract_issue_keys(commits)?;
    let mut groups = group_by_project(&keys);

    if groups.is_empty() {
        let project = req.default_project.ok_or_else(|| {
            StewardError::precondition(
                "no jira issue keys found in release commits and no default jira project configured",
            )
        })?;
        info!("no jira issue keys found: using default project {project}");
        groups.insert(project.to_string(), vec![]);
    }

    let projects = groups.keys().cloned().collect::<Vec<String>>();

    let results = join_all(groups.into_iter().map(|(project, issues)| {
        release_project(
            tracker,
            project,
            issues,
            req.version_name,
            req.description,
            req.done_status,
        )
    }))
    .await;

    Ok(projects.into_iter().zip(results).collect())
}
