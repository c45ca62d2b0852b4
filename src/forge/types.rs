//! Normalized GitHub entities shared by the label and release logic.

/// Result of looking up a remote entity that may legitimately be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound,
        }
    }
}

/// A branch ref and the commit it currently points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub sha: String,
}

/// Pull request details needed by the release and label flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub head_branch: String,
    pub base_branch: String,
    pub merged: bool,
    pub merge_commit_sha: Option<String>,
}

/// A commit as returned by the compare and pull request commit endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
    /// Login of the GitHub account the commit is attributed to, if any.
    pub author_login: Option<String>,
    pub message: String,
}

impl Commit {
    pub fn first_line(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn short_sha(&self) -> &str {
        let end = self.sha.len().min(7);
        &self.sha[..end]
    }
}

/// Commit delta between two refs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub total_commits: u64,
    pub commits: Vec<Commit>,
}

/// A published GitHub release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub id: u64,
    pub tag: String,
    pub name: String,
    pub url: String,
}

/// Request to find an open pull request by branch names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPrRequest {
    pub head_branch: String,
    pub base_branch: String,
}

/// Request to create a new pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

/// Request to update an existing pull request. Fields are full
/// replacements, never merged with the current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrRequest {
    pub pr_number: u64,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Request to replace every label on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrLabelsRequest {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

/// Request to tag and publish a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseRequest {
    pub tag: String,
    pub name: String,
    pub sha: String,
    pub notes: String,
}
