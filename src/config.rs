//! Configuration loading and parsing for `steward.toml` files.
//!
//! The file is read from the repository's default branch so each
//! repository can override the label exclusion groups and the release
//! branch layout. A missing file yields [`Config::default`].
use log::*;
use serde::Deserialize;

use crate::{Result, forge::traits::Forge};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "steward.toml";

/// Default tera template for release pull request bodies.
pub const DEFAULT_NOTES_TEMPLATE: &str = r#"# Release {{ date }}: {{ name }}
{% if truncated %}
> **Warning:** the comparison returned {{ commit_count }} commits, the most GitHub returns in one response. Some changes may be missing from these notes.
{% endif -%}
{% if pull_requests %}
## Pull Requests
{% for pr in pull_requests %}
- #{{ pr.number }} {{ pr.title }}
{%- endfor %}
{% endif -%}
{% if dependency_updates %}
## Dependency updates
{% for commit in dependency_updates %}
- {{ commit.short_sha }} {{ commit.summary }}
{%- endfor %}
{% endif -%}
"#;

/// Label settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelConfig {
    /// Groups of mutually exclusive labels. Adding any member of a group
    /// removes every other member currently present.
    pub exclusion_groups: Vec<Vec<String>>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            exclusion_groups: vec![
                [
                    "has-conflicts",
                    "has-failures",
                    "has-issues",
                    "in-progress",
                    "please-review",
                ]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            ],
        }
    }
}

/// Release branch and notes settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Branch whose tip the release branch tracks.
    pub source_branch: String,
    /// Long-lived branch the release pull request is opened from.
    pub release_branch: String,
    /// Stable branch the release pull request merges into.
    pub target_branch: String,
    /// Prefix prepended to the release version to build the tag name.
    pub tag_prefix: String,
    /// Labels added to the release pull request whenever it is synced.
    pub pr_labels: Vec<String>,
    /// Accounts whose version bump commits are listed as dependency updates.
    pub bot_authors: Vec<String>,
    /// Commit subjects that count as dependency bumps.
    pub bump_commit_pattern: String,
    /// Pull request titles that count as dependency bumps.
    pub bump_title_pattern: String,
    /// Tera template used to render the release pull request body.
    pub notes_template: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            source_branch: "develop".into(),
            release_branch: "release".into(),
            target_branch: "main".into(),
            tag_prefix: "v".into(),
            pr_labels: vec!["release".into()],
            bot_authors: vec!["dependabot[bot]".into(), "renovate[bot]".into()],
            bump_commit_pattern: r"^(?i)(chore\(deps[^)]*\): )?(bump|update) \S+ from \S+ to \S+".into(),
            bump_title_pattern: r"^(?i)(chore\(deps[^)]*\): |build\(deps[^)]*\): )?bump \S+ from \S+ to \S+".into(),
            notes_template: DEFAULT_NOTES_TEMPLATE.into(),
        }
    }
}

/// Jira cross-reference settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JiraConfig {
    /// Project that receives the release version when no commit references
    /// an issue key.
    pub default_project: Option<String>,
    /// Status issues are transitioned to once released.
    pub done_status: String,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            default_project: None,
            done_status: "Done".into(),
        }
    }
}

/// Root configuration structure for `steward.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub labels: LabelConfig,
    pub release: ReleaseConfig,
    pub jira: JiraConfig,
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the repository, falling back to defaults
    /// when no config file is committed.
    pub async fn load(forge: &dyn Forge) -> Result<Self> {
        match forge.get_file_content(DEFAULT_CONFIG_FILE).await? {
            Some(content) => {
                debug!("loaded {DEFAULT_CONFIG_FILE} from {}", forge.repo_name());
                Self::parse(&content)
            }
            None => {
                info!("no configuration found: using default");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::traits::MockForge;

    #[test]
    fn parses_partial_config_with_defaults() {
        let config = Config::parse(
            r#"
[labels]
exclusion_groups = [["in-progress", "please-review"], ["wip", "ready"]]

[release]
target_branch = "stable"

[jira]
default_project = "OPS"
"#,
        )
        .unwrap();

        assert_eq!(config.labels.exclusion_groups.len(), 2);
        assert_eq!(config.release.target_branch, "stable");
        assert_eq!(config.release.source_branch, "develop");
        assert_eq!(config.release.release_branch, "release");
        assert_eq!(config.jira.default_project.as_deref(), Some("OPS"));
        assert_eq!(config.jira.done_status, "Done");
    }

    #[test]
    fn default_patterns_are_valid_regex() {
        let release = ReleaseConfig::default();
        let commit_re = regex::Regex::new(&release.bump_commit_pattern).unwrap();
        let title_re = regex::Regex::new(&release.bump_title_pattern).unwrap();

        assert!(commit_re.is_match("Bump foo from 1 to 2"));
        assert!(commit_re.is_match("chore(deps): bump serde from 1.0.1 to 1.0.2"));
        assert!(!commit_re.is_match("Fix bump handling"));
        assert!(title_re.is_match("build(deps): Bump tokio from 1.0 to 1.1"));
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(Config::parse("[labels\nexclusion_groups = 1").is_err());
    }

    #[tokio::test]
    async fn load_falls_back_to_default_when_missing() {
        let mut forge = MockForge::new();
        forge
            .expect_get_file_content()
            .withf(|path| path == DEFAULT_CONFIG_FILE)
            .returning(|_| Ok(None));
        forge.expect_repo_name().returning(|| "acme/widgets".into());

        let config = Config::load(&forge).await.unwrap();

        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn load_parses_repository_file() {
        let mut forge = MockForge::new();
        forge.expect_get_file_content().returning(|_| {
            Ok(Some("[release]\nsource_branch = \"main\"\n".into()))
        });
        forge.expect_repo_name().returning(|| "acme/widgets".into());

        let config = Config::load(&forge).await.unwrap();

        assert_eq!(config.release.source_branch, "main");
    }
}
