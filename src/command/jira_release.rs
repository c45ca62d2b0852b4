//! Jira release command implementation.
use crate::{
    Result,
    command::common::{CommandContext, report_outcome},
};

/// Create the Jira version `"{version} ({name})"` for release pull request
/// `number` and move the referenced issues to done.
pub async fn execute(
    ctx: &CommandContext,
    number: u64,
    version: &str,
    name: &str,
) -> Result<()> {
    let result = async {
        ctx.release_manager()?
            .create_release(number, version, name)
            .await
    }
    .await;

    report_outcome(&ctx.reporter, "Jira release", result, |projects| {
        let projects = projects
            .iter()
            .map(|p| format!("{} ({} issues)", p.project, p.issues.len()))
            .collect::<Vec<String>>();

        if projects.is_empty() {
            format!("No Jira projects released for #{number}")
        } else {
            format!(
                "Jira release {version} ({name}) done: {}",
                projects.join(", ")
            )
        }
    })
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        error::StewardError,
        forge::{traits::MockForge, types::Lookup},
        jira::{IssueTracker, MockIssueTracker},
        report::Reporter,
        slack::MockNotifier,
    };
    use std::sync::Arc;

    fn context(forge: MockForge, notifier: MockNotifier) -> CommandContext {
        let mut tracker = MockIssueTracker::new();
        tracker.expect_find_release_version().times(0);

        CommandContext {
            forge: Arc::new(forge),
            config: Config::default(),
            tracker: Some(Arc::new(tracker) as Arc<dyn IssueTracker>),
            reporter: Reporter::new(Arc::new(notifier), "U123"),
        }
    }

    #[tokio::test]
    async fn missing_pull_request_sends_a_single_failure() {
        let mut forge = MockForge::new();
        forge.expect_repo_name().returning(|| "test/repo".into());
        forge
            .expect_get_pull_request()
            .withf(|number| *number == 999)
            .returning(|_| Ok(Lookup::NotFound));
        forge.expect_get_pull_request_commits().times(0);

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_user_message()
            .withf(|user_id, text| {
                user_id == "U123"
                    && text
                        == ":x: Jira release failed: Not found: release pull request #999 in test/repo"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let ctx = context(forge, notifier);

        let result = execute(&ctx, 999, "2026.10.17", "Brave Badger").await;

        assert!(matches!(result, Err(StewardError::NotFound { .. })));
    }

    #[tokio::test]
    async fn commit_fetch_failure_sends_a_single_failure() {
        let mut forge = MockForge::new();
        forge.expect_repo_name().returning(|| "test/repo".into());
        forge.expect_get_pull_request().returning(|number| {
            Ok(Lookup::Found(crate::test_helpers::test_merged_pull_request(
                number,
                "Release 2026-10-17: Brave Badger",
                "release",
                "main",
                "merge-sha",
            )))
        });
        forge
            .expect_get_pull_request_commits()
            .returning(|_| Err(StewardError::external("github is down")));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send_user_message()
            .withf(|_, text| {
                text == ":x: Jira release failed: External service error: github is down"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let ctx = context(forge, notifier);

        assert!(execute(&ctx, 7, "2026.10.17", "Brave Badger").await.is_err());
    }
}
