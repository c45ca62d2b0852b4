//! Resolves a human actor to their identities across GitHub, Slack and Jira.
use async_trait::async_trait;
use log::*;
#[cfg(test)]
use mockall::automock;
use reqwest::{
    Client, StatusCode, Url,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Result, error::StewardError};

/// Cross-system identifiers for one person.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    pub slack_user_id: String,
    pub github_username: String,
    #[serde(default)]
    pub jira_account_id: Option<String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Look up a person by email address or display name.
    async fn fetch_user_credentials(
        &self,
        email_or_name: &str,
    ) -> Result<UserCredentials>;
}

/// HTTP client for the internal credential service.
pub struct CredentialClient {
    client: Client,
    base_url: Url,
}

impl CredentialClient {
    pub fn new(base_url: &str, token: SecretString) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token_value = HeaderValue::from_str(&format!(
            "Bearer {}",
            token.expose_secret()
        ))?;
        token_value.set_sensitive(true);
        headers.append("Authorization", token_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url =
            Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl CredentialService for CredentialClient {
    async fn fetch_user_credentials(
        &self,
        email_or_name: &str,
    ) -> Result<UserCredentials> {
        let url = self.base_url.join("users")?;

        debug!("resolving credentials for {email_or_name}");

        let response = self
            .client
            .get(url)
            .query(&[("query", email_or_name)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StewardError::not_found(format!(
                "credentials for {email_or_name}"
            )));
        }

        let credentials = response
            .error_for_status()?
            .json::<UserCredentials>()
            .await?;

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_credentials_without_jira_account() {
        let credentials: UserCredentials =
            serde_json::from_value(serde_json::json!({
                "email": "dev@acme.io",
                "slack_user_id": "U123",
                "github_username": "octodev"
            }))
            .unwrap();

        assert_eq!(credentials.slack_user_id, "U123");
        assert!(credentials.jira_account_id.is_none());
    }

    #[test]
    fn normalizes_base_url() {
        let client = CredentialClient::new(
            "https://creds.acme.io/api",
            SecretString::from("t".to_string()),
        )
        .unwrap();

        assert_eq!(
            client.base_url.join("users").unwrap().as_str(),
            "https://creds.acme.io/api/users"
        );
    }
}
