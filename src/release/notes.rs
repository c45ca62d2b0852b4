//! Release notes built from the commit delta between two branches.
use futures::future::join_all;
use log::*;
use regex::Regex;
use serde::Serialize;

use crate::{
    Result,
    config::ReleaseConfig,
    error::StewardError,
    forge::{
        config::COMPARE_COMMIT_LIMIT,
        traits::Forge,
        types::{Commit, Comparison, Lookup, PullRequest},
    },
    release::name::ReleaseTitle,
};

const PR_MARKER_PATTERN: &str = r"\[#(?<number>\d+)\]";
const BRACKET_PREFIX_PATTERN: &str = r"^(\s*\[[^\]]*\])+\s*";

#[derive(Debug, Serialize)]
struct NotesPullRequest {
    number: u64,
    title: String,
}

#[derive(Debug, Serialize)]
struct NotesCommit {
    short_sha: String,
    summary: String,
}

#[derive(Debug, Serialize)]
struct NotesContext {
    date: String,
    name: String,
    truncated: bool,
    commit_count: usize,
    pull_requests: Vec<NotesPullRequest>,
    dependency_updates: Vec<NotesCommit>,
}

/// Commits split by how they appear in the notes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PartitionedCommits<'a> {
    /// Unique pull request numbers in the order they were first seen.
    pub pull_requests: Vec<u64>,
    pub dependency_updates: Vec<&'a Commit>,
}

/// Renders release notes from a commit comparison.
pub struct ReleaseNotesBuilder {
    bot_authors: Vec<String>,
    bump_commit_re: Regex,
    bump_title_re: Regex,
    pr_marker_re: Regex,
    bracket_prefix_re: Regex,
    template: String,
}

impl ReleaseNotesBuilder {
    pub fn from_config(config: &ReleaseConfig) -> Result<Self> {
        let compile = |pattern: &str, field: &str| {
            Regex::new(pattern).map_err(|err| {
                StewardError::invalid_config(format!(
                    "release.{field} is not a valid regex: {err}"
                ))
            })
        };

        Ok(Self {
            bot_authors: config.bot_authors.clone(),
            bump_commit_re: compile(
                &config.bump_commit_pattern,
                "bump_commit_pattern",
            )?,
            bump_title_re: compile(
                &config.bump_title_pattern,
                "bump_title_pattern",
            )?,
            pr_marker_re: Regex::new(PR_MARKER_PATTERN)?,
            bracket_prefix_re: Regex::new(BRACKET_PREFIX_PATTERN)?,
            template: config.notes_template.clone(),
        })
    }

    fn is_dependency_update(&self, commit: &Commit) -> bool {
        let from_bot = commit
            .author_login
            .as_ref()
            .is_some_and(|login| self.bot_authors.contains(login));

        from_bot && self.bump_commit_re.is_match(commit.first_line())
    }

    fn pull_request_number(&self, commit: &Commit) -> Option<u64> {
        self.pr_marker_re
            .captures(commit.first_line())
            .and_then(|c| c["number"].parse().ok())
    }

    /// Split commits into dependency bumps and pull request merges.
    /// Commits that are neither are left out of the notes.
    pub fn partition<'a>(&self, commits: &'a [Commit]) -> PartitionedCommits<'a> {
        let mut partitioned = PartitionedCommits::default();

        for commit in commits {
            if self.is_dependency_update(commit) {
                partitioned.dependency_updates.push(commit);
            } else if let Some(number) = self.pull_request_number(commit)
                && !partitioned.pull_requests.contains(&number)
            {
                partitioned.pull_requests.push(number);
            }
        }

        partitioned
    }

    /// Strip leading bracketed tags such as `[#12]` or `[OPS-4]`.
    pub fn clean_title(&self, title: &str) -> String {
        self.bracket_prefix_re.replace(title, "").trim().to_string()
    }

    /// Fetch each pull request concurrently. Results keep the order of
    /// `numbers` regardless of completion order.
    async fn fetch_pull_requests(
        &self,
        forge: &dyn Forge,
        numbers: &[u64],
    ) -> Result<Vec<PullRequest>> {
        let lookups =
            join_all(numbers.iter().map(|n| forge.get_pull_request(*n))).await;

        let mut prs = vec![];

        for (number, lookup) in numbers.iter().zip(lookups) {
            match lookup? {
                Lookup::Found(pr) => prs.push(pr),
                Lookup::NotFound => {
                    warn!("pull request #{number} referenced by a commit was not found: skipping")
                }
            }
        }

        Ok(prs)
    }

    pub async fn compute_release_notes(
        &self,
        forge: &dyn Forge,
        title: &ReleaseTitle,
        comparison: &Comparison,
    ) -> Result<String> {
        let partitioned = self.partition(&comparison.commits);

        let pull_requests = self
            .fetch_pull_requests(forge, &partitioned.pull_requests)
            .await?
            .into_iter()
            .filter(|pr| {
                let is_bump = self.bump_title_re.is_match(&pr.title);
                if is_bump {
                    debug!("skipping dependency pull request #{}", pr.number);
                }
                !is_bump
            })
            .map(|pr| NotesPullRequest {
                number: pr.number,
                title: self.clean_title(&pr.title),
            })
            .collect::<Vec<NotesPullRequest>>();

        let dependency_updates = partitioned
            .dependency_updates
            .iter()
            .map(|c| NotesCommit {
                short_sha: c.short_sha().to_string(),
                summary: c.first_line().to_string(),
            })
            .collect::<Vec<NotesCommit>>();

        let commit_count = comparison.commits.len();
        let truncated = commit_count >= COMPARE_COMMIT_LIMIT;

        if truncated {
            warn!(
                "comparison returned {commit_count} of {} commits: notes may be incomplete",
                comparison.total_commits
            );
        }

        let context = tera::Context::from_serialize(NotesContext {
            date: title.date.format("%Y-%m-%d").to_string(),
            name: title.name.clone(),
            truncated,
            commit_count,
            pull_requests,
            dependency_updates,
        })?;

        let notes = tera::Tera::one_off(&self.template, &context, false)?;

        Ok(notes)
    }
}
