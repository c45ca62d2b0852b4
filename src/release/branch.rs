//! Keeps the release branch pointed at the source branch tip.
use log::*;

use crate::{
    Result,
    error::StewardError,
    forge::{
        traits::Forge,
        types::{Branch, Lookup},
    },
};

/// At most one delete and one create are needed to converge, so the branch
/// is read at most three times.
pub const MAX_BRANCH_SYNC_ATTEMPTS: usize = 3;

/// Make sure `branch` exists and points at `source_sha`.
///
/// A missing branch is created; a branch at any other commit is deleted and
/// recreated. The returned branch is always what the server reported on the
/// final read, never a locally constructed value.
pub async fn ensure_release_branch(
    forge: &dyn Forge,
    branch: &str,
    source_sha: &str,
) -> Result<Branch> {
    let mut deleted = false;
    let mut created = false;

    for attempt in 1..=MAX_BRANCH_SYNC_ATTEMPTS {
        match forge.get_branch(branch).await? {
            Lookup::Found(current) if current.sha == source_sha => {
                debug!("{branch} is in sync at {source_sha} (attempt {attempt})");
                return Ok(current);
            }
            Lookup::Found(current) => {
                if deleted {
                    break;
                }
                info!(
                    "{branch} is stale at {}: recreating from {source_sha}",
                    current.sha
                );
                forge.delete_branch(branch).await?;
                deleted = true;
            }
            Lookup::NotFound => {
                if created {
                    break;
                }
                info!("{branch} does not exist: creating from {source_sha}");
                forge.create_branch(branch, source_sha).await?;
                created = true;
            }
        }
    }

    Err(StewardError::BranchSyncExhausted {
        branch: branch.to_string(),
        sha: source_sha.to_string(),
        attempts: MAX_BRANCH_SYNC_ATTEMPTS,
    })
}
