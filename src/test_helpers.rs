//! Common test helper functions shared across test modules.
//!
//! Fixture builders for the normalized GitHub entities so each test only
//! spells out the fields it cares about.
use chrono::NaiveDate;

use crate::forge::types::{Branch, Commit, PullRequest};

/// Fixed date used for release titles in tests.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

pub fn test_branch(name: &str, sha: &str) -> Branch {
    Branch {
        name: name.to_string(),
        sha: sha.to_string(),
    }
}

/// Commit authored by a human with the given message.
pub fn test_commit(sha: &str, message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        author_login: Some("octocat".to_string()),
        message: message.to_string(),
    }
}

/// Commit attributed to a bot account.
pub fn test_bot_commit(sha: &str, author: &str, message: &str) -> Commit {
    Commit {
        author_login: Some(author.to_string()),
        ..test_commit(sha, message)
    }
}

/// Open pull request from `head` into `base`.
pub fn test_pull_request(
    number: u64,
    title: &str,
    head: &str,
    base: &str,
) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        head_branch: head.to_string(),
        base_branch: base.to_string(),
        ..PullRequest::default()
    }
}

/// Merged pull request from `head` into `base`.
pub fn test_merged_pull_request(
    number: u64,
    title: &str,
    head: &str,
    base: &str,
    merge_sha: &str,
) -> PullRequest {
    PullRequest {
        merged: true,
        merge_commit_sha: Some(merge_sha.to_string()),
        ..test_pull_request(number, title, head, base)
    }
}
