use serde::{Deserialize, Serialize};

use crate::forge::types::{Commit, Comparison};

#[derive(Debug, Deserialize)]
pub struct GithubUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommitDetail {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GithubCommit {
    pub sha: String,
    pub author: Option<GithubUser>,
    pub commit: GithubCommitDetail,
}

impl From<GithubCommit> for Commit {
    fn from(value: GithubCommit) -> Self {
        Commit {
            sha: value.sha,
            author_login: value.author.map(|a| a.login),
            message: value.commit.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GithubCompare {
    pub total_commits: u64,
    pub commits: Vec<GithubCommit>,
}

impl From<GithubCompare> for Comparison {
    fn from(value: GithubCompare) -> Self {
        Comparison {
            total_commits: value.total_commits,
            commits: value.commits.into_iter().map(Commit::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageParams {
    pub per_page: u8,
    pub page: u32,
}
