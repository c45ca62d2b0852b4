//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::{
    Octocrab,
    models::{pulls::PullRequest as OctoPullRequest, repos::Object},
    params::{self, repos::Reference},
};
use reqwest::StatusCode;

use crate::{
    Result,
    error::StewardError,
    forge::{
        config::{DEFAULT_PAGE_SIZE, RemoteConfig},
        github::types::{GithubCommit, GithubCompare, PageParams},
        traits::Forge,
        types::{
            Branch, Commit, Comparison, CreatePrRequest, CreateReleaseRequest,
            GetPrRequest, Lookup, PrLabelsRequest, PullRequest, Release,
            UpdatePrRequest,
        },
    },
};

mod types;

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(
        err,
        octocrab::Error::GitHub { source, .. }
            if source.status_code == StatusCode::NOT_FOUND
    )
}

fn to_pull_request(pr: OctoPullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        body: pr.body.unwrap_or_default(),
        head_branch: pr.head.ref_field,
        base_branch: pr.base.ref_field,
        merged: pr.merged_at.is_some() || pr.merged.unwrap_or(false),
        merge_commit_sha: pr.merge_commit_sha,
    }
}

/// GitHub forge implementation using Octocrab for labels, refs, pull
/// requests, commit comparisons and releases.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
    default_branch: String,
}

impl Github {
    /// Create GitHub client with personal access token authentication and
    /// resolve the repository's default branch.
    pub async fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_base_uri();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        let repo = instance.repos(&config.owner, &config.repo).get().await?;
        let default_branch = repo.default_branch.ok_or_else(|| {
            StewardError::not_found(format!(
                "default branch for github repo {}",
                config.path
            ))
        })?;

        Ok(Self {
            config,
            base_uri,
            instance,
            default_branch,
        })
    }

    fn repo_endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_uri, self.config.owner, self.config.repo, suffix
        )
    }
}

#[async_trait]
impl Forge for Github {
    fn repo_name(&self) -> String {
        self.config.path.clone()
    }

    async fn get_file_content(&self, path: &str) -> Result<Option<String>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_content()
            .path(path)
            .r#ref(&self.default_branch)
            .send()
            .await;

        match result {
            Err(err) if is_not_found(&err) => {
                info!("no file found for path: {path}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
            Ok(mut data) => {
                let items = data.take_items();

                if items.is_empty() {
                    info!("no file found for path: {path}");
                    return Ok(None);
                }

                items[0].decoded_content().map(Some).ok_or_else(|| {
                    StewardError::external(format!(
                        "failed to decode file content for path: {path}"
                    ))
                })
            }
        }
    }

    async fn get_labels(&self, number: u64) -> Result<Lookup<Vec<String>>> {
        let result = self
            .instance
            .issues(&self.config.owner, &self.config.repo)
            .list_labels_for_issue(number)
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await;

        let page = match result {
            Err(err) if is_not_found(&err) => return Ok(Lookup::NotFound),
            Err(err) => return Err(err.into()),
            Ok(page) => page,
        };

        let labels = self.instance.all_pages(page).await?;

        Ok(Lookup::Found(labels.into_iter().map(|l| l.name).collect()))
    }

    /// Labels that do not exist in the repository yet are created by
    /// GitHub as part of the replace.
    async fn replace_labels(
        &self,
        req: PrLabelsRequest,
    ) -> Result<Vec<String>> {
        let labels = self
            .instance
            .issues(&self.config.owner, &self.config.repo)
            .replace_all_labels(req.pr_number, &req.labels)
            .await?;

        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    async fn get_branch(&self, name: &str) -> Result<Lookup<Branch>> {
        let result = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&Reference::Branch(name.to_string()))
            .await;

        match result {
            Err(err) if is_not_found(&err) => Ok(Lookup::NotFound),
            Err(err) => Err(err.into()),
            Ok(git_ref) => match git_ref.object {
                Object::Commit { sha, .. } => Ok(Lookup::Found(Branch {
                    name: name.to_string(),
                    sha,
                })),
                _ => Err(StewardError::external(format!(
                    "ref for branch {name} does not point at a commit"
                ))),
            },
        }
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<Branch> {
        info!("creating branch {name} at {sha}");

        let git_ref = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .create_ref(&Reference::Branch(name.to_string()), sha)
            .await?;

        match git_ref.object {
            Object::Commit { sha, .. } => Ok(Branch {
                name: name.to_string(),
                sha,
            }),
            _ => Err(StewardError::external(format!(
                "created ref for branch {name} does not point at a commit"
            ))),
        }
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        info!("deleting branch {name}");

        self.instance
            .repos(&self.config.owner, &self.config.repo)
            .delete_ref(&Reference::Branch(name.to_string()))
            .await?;

        Ok(())
    }

    async fn find_open_pull_request(
        &self,
        req: GetPrRequest,
    ) -> Result<Lookup<PullRequest>> {
        let page = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(params::State::Open)
            .head(format!("{}:{}", self.config.owner, req.head_branch))
            .base(req.base_branch.clone())
            .per_page(DEFAULT_PAGE_SIZE)
            .send()
            .await?;

        let mut prs = page
            .items
            .into_iter()
            .filter(|pr| {
                pr.head.ref_field == req.head_branch
                    && pr.base.ref_field == req.base_branch
            })
            .map(to_pull_request)
            .collect::<Vec<PullRequest>>();

        if prs.len() > 1 {
            let numbers = prs
                .iter()
                .map(|pr| format!("#{}", pr.number))
                .collect::<Vec<String>>()
                .join(", ");
            return Err(StewardError::ambiguous(format!(
                "found multiple open pull requests from {} into {}: {numbers}",
                req.head_branch, req.base_branch
            )));
        }

        Ok(prs.pop().into())
    }

    async fn create_pull_request(
        &self,
        req: CreatePrRequest,
    ) -> Result<PullRequest> {
        let pr = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await?;

        Ok(to_pull_request(pr))
    }

    async fn update_pull_request(
        &self,
        req: UpdatePrRequest,
    ) -> Result<PullRequest> {
        let pulls = self.instance.pulls(&self.config.owner, &self.config.repo);
        let mut builder = pulls.update(req.pr_number);

        if let Some(title) = req.title {
            builder = builder.title(title);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let pr = builder.send().await?;

        Ok(to_pull_request(pr))
    }

    async fn get_pull_request(
        &self,
        number: u64,
    ) -> Result<Lookup<PullRequest>> {
        let result = self
            .instance
            .pulls(&self.config.owner, &self.config.repo)
            .get(number)
            .await;

        match result {
            Err(err) if is_not_found(&err) => Ok(Lookup::NotFound),
            Err(err) => Err(err.into()),
            Ok(pr) => Ok(Lookup::Found(to_pull_request(pr))),
        }
    }

    async fn get_pull_request_commits(
        &self,
        number: u64,
    ) -> Result<Vec<Commit>> {
        let endpoint = self.repo_endpoint(&format!("pulls/{number}/commits"));
        let mut commits = vec![];
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: DEFAULT_PAGE_SIZE,
                page,
            };

            let batch: Vec<GithubCommit> =
                self.instance.get(&endpoint, Some(&params)).await?;
            let batch_len = batch.len();

            commits.extend(batch.into_iter().map(Commit::from));

            if batch_len < DEFAULT_PAGE_SIZE as usize {
                break;
            }

            page += 1;
        }

        debug!("found {} commits for pull request #{number}", commits.len());

        Ok(commits)
    }

    async fn compare_commits(
        &self,
        base: &str,
        head: &str,
    ) -> Result<Comparison> {
        let endpoint = self.repo_endpoint(&format!("compare/{base}...{head}"));

        let compare: GithubCompare =
            self.instance.get(&endpoint, None::<&()>).await?;

        debug!(
            "compare {base}...{head}: {} total commits, {} returned",
            compare.total_commits,
            compare.commits.len()
        );

        Ok(compare.into())
    }

    async fn create_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<Release> {
        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag)
            .name(&req.name)
            .body(&req.notes)
            .target_commitish(&req.sha)
            .draft(false)
            .prerelease(false)
            .send()
            .await?;

        Ok(Release {
            id: release.id.into_inner(),
            tag: release.tag_name,
            name: release.name.unwrap_or(req.name),
            url: release.html_url.to_string(),
        })
    }
}
