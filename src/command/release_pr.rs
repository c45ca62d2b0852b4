//! Release pull request command implementation.
use chrono::{Local, NaiveDate};

use crate::{
    Result,
    command::common::{CommandContext, report_outcome},
};

/// Sync the release branch with the source branch and open or update the
/// release pull request, stamped with `date` or today.
pub async fn execute(
    ctx: &CommandContext,
    date: Option<NaiveDate>,
) -> Result<()> {
    let as_of = date.unwrap_or_else(|| Local::now().date_naive());
    let release = &ctx.config.release;

    let result = async { ctx.release_manager()?.prepare_release(as_of).await }.await;

    report_outcome(&ctx.reporter, "Release pull request", result, |prepared| {
        match prepared {
            Some(prepared) => format!(
                "Release pull request #{} is up to date: {}",
                prepared.pull_request.number,
                prepared.title.render()
            ),
            None => format!(
                "{} already contains everything in {}: no release pull request needed",
                release.target_branch, release.source_branch
            ),
        }
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config, forge::traits::MockForge, report::Reporter,
        slack::MockNotifier,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn invalid_bump_pattern_is_reported_to_the_requester() {
        let mut forge = MockForge::new();
        forge.expect_get_branch().times(0);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_user_message()
            .withf(|user_id, text| {
                user_id == "U123"
                    && text.starts_with(
                        ":x: Release pull request failed: Invalid configuration: release.bump_title_pattern",
                    )
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut config = Config::default();
        config.release.bump_title_pattern = "(unclosed".into();

        let ctx = CommandContext {
            forge: Arc::new(forge),
            config,
            tracker: None,
            reporter: Reporter::new(Arc::new(notifier), "U123"),
        };

        let result = execute(&ctx, NaiveDate::from_ymd_opt(2026, 10, 17)).await;

        assert!(matches!(
            result,
            Err(crate::error::StewardError::InvalidConfig(_))
        ));
    }
}
