//! Release command implementation.
use crate::{
    Result,
    command::common::{CommandContext, report_outcome},
};

/// Tag merged release pull request `number` and mirror it into Jira.
pub async fn execute(ctx: &CommandContext, number: u64) -> Result<()> {
    let result = async { ctx.release_manager()?.publish_release(number).await }.await;

    report_outcome(&ctx.reporter, "Release", result, |published| {
        match published {
            Some(published) => format!(
                "Released {} as {}: {}",
                published.release.name,
                published.release.tag,
                published.release.url
            ),
            None => format!(
                "#{number} is not a merged release pull request: nothing released"
            ),
        }
    })
    .await?;

    Ok(())
}
