//! Configuration for the GitHub connection.
use git_url_parse::GitUrl;
use secrecy::SecretString;

use crate::{Result, error::StewardError};

/// Default page size for paginated list queries
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// Maximum number of commits the compare endpoint returns in one response.
pub const COMPARE_COMMIT_LIMIT: usize = 250;

/// Remote repository connection configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Full repository path (owner/repo).
    pub path: String,
    /// Access token for authentication.
    pub token: SecretString,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            path: "".to_string(),
            token: SecretString::from("".to_string()),
        }
    }
}

impl RemoteConfig {
    /// Parse a GitHub repository URL (https://github.com/owner/repo) into a
    /// remote config authenticated with the given token.
    pub fn from_repo_url(repo_url: &str, token: SecretString) -> Result<Self> {
        let parsed = GitUrl::parse(repo_url)?;

        match parsed.scheme {
            git_url_parse::Scheme::Http | git_url_parse::Scheme::Https => {}
            _ => {
                return Err(StewardError::InvalidRemoteUrl(format!(
                    "only http and https schemes are supported: {repo_url}"
                )));
            }
        }

        let host = parsed.host.ok_or_else(|| {
            StewardError::InvalidRemoteUrl(format!(
                "unable to parse host from {repo_url}"
            ))
        })?;

        let owner = parsed.owner.ok_or_else(|| {
            StewardError::InvalidRemoteUrl(format!(
                "unable to parse owner from {repo_url}"
            ))
        })?;

        Ok(Self {
            host,
            scheme: parsed.scheme.to_string(),
            path: format!("{}/{}", owner, parsed.name),
            owner,
            repo: parsed.name,
            token,
        })
    }

    /// Base URI of the REST API for this host.
    pub fn api_base_uri(&self) -> String {
        format!("{}://api.{}", self.scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remote_config() {
        let remote = RemoteConfig::default();
        assert!(remote.owner.is_empty());
    }

    #[test]
    fn parses_github_repo_url() {
        let config = RemoteConfig::from_repo_url(
            "https://github.com/acme/widgets",
            SecretString::from("token".to_string()),
        )
        .unwrap();

        assert_eq!(config.host, "github.com");
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "widgets");
        assert_eq!(config.path, "acme/widgets");
        assert_eq!(config.api_base_uri(), "https://api.github.com");
    }

    #[test]
    fn rejects_ssh_repo_url() {
        let result = RemoteConfig::from_repo_url(
            "git@github.com:acme/widgets.git",
            SecretString::from("token".to_string()),
        );

        assert!(matches!(result, Err(StewardError::InvalidRemoteUrl(_))));
    }
}
