//! Common test utilities for release tests.

use std::sync::Arc;

use crate::{
    config::Config,
    forge::traits::MockForge,
    jira::{IssueTracker, MockIssueTracker, types::Version},
    release::{ReleaseLifecycleManager, ReleaseManagerParams},
};

pub const REPO_NAME: &str = "test/repo";

/// MockForge that answers `repo_name` any number of times.
pub fn mock_forge() -> MockForge {
    let mut forge = MockForge::new();
    forge.expect_repo_name().returning(|| REPO_NAME.to_string());
    forge
}

pub fn test_version(id: &str, name: &str) -> Version {
    Version {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
    }
}

/// Creates a manager with default configuration and no Jira connection.
///
/// # Example
/// ```ignore
/// let mut forge = mock_forge();
/// forge.expect_get_branch().returning(|_| Ok(Lookup::NotFound));
/// let manager = create_test_manager(forge);
/// ```
pub fn create_test_manager(forge: MockForge) -> ReleaseLifecycleManager {
    ReleaseLifecycleManager::new(
        ReleaseManagerParams::builder()
            .forge(Arc::new(forge))
            .build()
            .unwrap(),
    )
    .unwrap()
}

/// Creates a manager wired to a Jira mock.
pub fn create_test_manager_with_tracker(
    forge: MockForge,
    tracker: MockIssueTracker,
    config: Config,
) -> ReleaseLifecycleManager {
    ReleaseLifecycleManager::new(
        ReleaseManagerParams::builder()
            .forge(Arc::new(forge))
            .tracker(Some(Arc::new(tracker) as Arc<dyn IssueTracker>))
            .config(config)
            .build()
            .unwrap(),
    )
    .unwrap()
}
