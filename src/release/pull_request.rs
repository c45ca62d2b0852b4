use log::*;

use crate::{
    Result,
    forge::{
        traits::Forge,
        types::{
            CreatePrRequest, GetPrRequest, Lookup, PullRequest, UpdatePrRequest,
        },
    },
    release::name::ReleaseTitle,
};

/// Open the release pull request, or replace the title and body of the one
/// already open from `head` into `base`. The open pull request is searched
/// for on every call.
pub async fn ensure_release_pull_request(
    forge: &dyn Forge,
    head: &str,
    base: &str,
    title: &ReleaseTitle,
    body: &str,
) -> Result<PullRequest> {
    info!("searching for open release pr from {head} into {base}");

    let existing = forge
        .find_open_pull_request(GetPrRequest {
            head_branch: head.to_string(),
            base_branch: base.to_string(),
        })
        .await?;

    match existing {
        Lookup::Found(pr) => {
            let pr = forge
                .update_pull_request(UpdatePrRequest {
                    pr_number: pr.number,
                    title: Some(title.render()),
                    body: Some(body.to_string()),
                })
                .await?;
            info!("updated existing release pr: #{}", pr.number);
            Ok(pr)
        }
        Lookup::NotFound => {
            let pr = forge
                .create_pull_request(CreatePrRequest {
                    head_branch: head.to_string(),
                    base_branch: base.to_string(),
                    title: title.render(),
                    body: body.to_string(),
                })
                .await?;
            info!("created release pr: #{}", pr.number);
            Ok(pr)
        }
    }
}
