//! Traits related to the remote git forge
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::types::{
        Branch, Commit, Comparison, CreatePrRequest, CreateReleaseRequest,
        GetPrRequest, Lookup, PrLabelsRequest, PullRequest, Release,
        UpdatePrRequest,
    },
};

/// Operations the automation needs from a GitHub repository. Every method
/// reads or writes authoritative remote state; nothing is cached.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn repo_name(&self) -> String;
    async fn get_file_content(&self, path: &str) -> Result<Option<String>>;

    async fn get_labels(&self, number: u64) -> Result<Lookup<Vec<String>>>;
    async fn replace_labels(&self, req: PrLabelsRequest)
    -> Result<Vec<String>>;

    async fn get_branch(&self, name: &str) -> Result<Lookup<Branch>>;
    async fn create_branch(&self, name: &str, sha: &str) -> Result<Branch>;
    async fn delete_branch(&self, name: &str) -> Result<()>;

    async fn find_open_pull_request(
        &self,
        req: GetPrRequest,
    ) -> Result<Lookup<PullRequest>>;
    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest>;
    async fn update_pull_request(
        &self,
        req: UpdatePrRequest,
    ) -> Result<PullRequest>;
    async fn get_pull_request(&self, number: u64)
    -> Result<Lookup<PullRequest>>;
    async fn get_pull_request_commits(&self, number: u64)
    -> Result<Vec<Commit>>;

    async fn compare_commits(&self, base: &str, head: &str)
    -> Result<Comparison>;
    async fn create_release(&self, req: CreateReleaseRequest)
    -> Result<Release>;
}
