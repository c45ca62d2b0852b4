//! Tests for release notes.
//!
//! Tests for:
//! - Splitting commits into pull requests and dependency updates
//! - Title cleanup
//! - Rendering order, determinism and the truncation warning

use super::common::*;
use crate::{
    config::ReleaseConfig,
    error::StewardError,
    forge::{
        config::COMPARE_COMMIT_LIMIT,
        types::{Comparison, Lookup},
    },
    release::{name::ReleaseTitle, notes::ReleaseNotesBuilder},
    test_helpers::*,
};

fn builder() -> ReleaseNotesBuilder {
    ReleaseNotesBuilder::from_config(&ReleaseConfig::default()).unwrap()
}

fn title() -> ReleaseTitle {
    ReleaseTitle::new(test_date(), "Energetic Eagle")
}

fn comparison() -> Comparison {
    let commits = vec![
        test_commit("a1b2c3d4e5", "[#100] Add login page"),
        test_bot_commit(
            "b2c3d4e5f6",
            "dependabot[bot]",
            "Bump serde from 1.0.1 to 1.0.2",
        ),
        test_commit("c3d4e5f6a7", "Merge branch 'develop' into release"),
        test_commit("d4e5f6a7b8", "[#100] Follow up on review"),
        test_commit("e5f6a7b8c9", "[#101] Bump tokio from 1.46 to 1.47"),
    ];

    Comparison {
        total_commits: commits.len() as u64,
        commits,
    }
}

fn forge_with_pull_requests() -> crate::forge::traits::MockForge {
    let mut forge = mock_forge();
    forge.expect_get_pull_request().returning(|number| match number {
        100 => Ok(Lookup::Found(test_pull_request(
            100,
            "[OPS-1] Add login page",
            "feature/login",
            "develop",
        ))),
        101 => Ok(Lookup::Found(test_pull_request(
            101,
            "Bump tokio from 1.46 to 1.47",
            "dependabot/cargo/tokio",
            "develop",
        ))),
        _ => Ok(Lookup::NotFound),
    });
    forge
}

#[test]
fn partition_separates_bot_bumps_from_pull_requests() {
    let comparison = comparison();

    let partitioned = builder().partition(&comparison.commits);

    assert_eq!(partitioned.pull_requests, vec![100, 101]);
    assert_eq!(partitioned.dependency_updates.len(), 1);
    assert_eq!(partitioned.dependency_updates[0].sha, "b2c3d4e5f6");
}

#[test]
fn partition_requires_a_bot_author_for_dependency_updates() {
    let commits = vec![
        test_commit("a1", "Bump serde from 1.0.1 to 1.0.2"),
        test_bot_commit("b2", "dependabot[bot]", "[#55] Group updates"),
    ];

    let partitioned = builder().partition(&commits);

    assert!(partitioned.dependency_updates.is_empty());
    assert_eq!(partitioned.pull_requests, vec![55]);
}

#[test]
fn partition_only_reads_the_subject_line() {
    let commits = vec![test_commit("a1", "Tidy imports\n\nSee [#77]")];

    let partitioned = builder().partition(&commits);

    assert!(partitioned.pull_requests.is_empty());
}

#[test]
fn clean_title_strips_leading_tags() {
    let builder = builder();

    assert_eq!(builder.clean_title("[OPS-1][#100] Add login"), "Add login");
    assert_eq!(builder.clean_title("  [wip] Draft [keep] this"), "Draft [keep] this");
    assert_eq!(builder.clean_title("Plain title"), "Plain title");
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let config = ReleaseConfig {
        bump_title_pattern: "(unclosed".into(),
        ..ReleaseConfig::default()
    };

    assert!(matches!(
        ReleaseNotesBuilder::from_config(&config),
        Err(StewardError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn renders_pull_requests_before_dependency_updates() {
    let forge = forge_with_pull_requests();

    let notes = builder()
        .compute_release_notes(&forge, &title(), &comparison())
        .await
        .unwrap();

    assert!(notes.starts_with("# Release 2026-10-17: Energetic Eagle"));
    assert!(notes.contains("- #100 Add login page"));
    assert!(!notes.contains("#101"));
    assert!(notes.contains("- b2c3d4e Bump serde from 1.0.1 to 1.0.2"));
    assert!(!notes.contains("Merge branch"));
    assert!(!notes.contains("Warning"));

    let prs = notes.find("## Pull Requests").unwrap();
    let deps = notes.find("## Dependency updates").unwrap();
    assert!(prs < deps);
}

#[tokio::test]
async fn rendering_is_deterministic() {
    let forge = forge_with_pull_requests();
    let builder = builder();

    let first = builder
        .compute_release_notes(&forge, &title(), &comparison())
        .await
        .unwrap();
    let second = builder
        .compute_release_notes(&forge, &title(), &comparison())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_pull_requests_are_skipped() {
    let mut forge = mock_forge();
    forge
        .expect_get_pull_request()
        .returning(|_| Ok(Lookup::NotFound));

    let notes = builder()
        .compute_release_notes(&forge, &title(), &comparison())
        .await
        .unwrap();

    assert!(!notes.contains("## Pull Requests"));
    assert!(notes.contains("## Dependency updates"));
}

#[tokio::test]
async fn pull_request_errors_fail_the_notes() {
    let mut forge = mock_forge();
    forge
        .expect_get_pull_request()
        .returning(|_| Err(StewardError::external("boom")));

    let result = builder()
        .compute_release_notes(&forge, &title(), &comparison())
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn warns_when_the_comparison_hits_the_commit_limit() {
    let mut forge = mock_forge();
    forge.expect_get_pull_request().times(0);

    let commits = (0..COMPARE_COMMIT_LIMIT)
        .map(|i| test_commit(&format!("sha{i:04}"), &format!("chore: tidy {i}")))
        .collect::<Vec<_>>();
    let comparison = Comparison {
        total_commits: 400,
        commits,
    };

    let notes = builder()
        .compute_release_notes(&forge, &title(), &comparison)
        .await
        .unwrap();

    assert!(notes.contains("**Warning:**"));
    assert!(notes.contains(&COMPARE_COMMIT_LIMIT.to_string()));
}
