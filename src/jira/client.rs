//! Implements the IssueTracker trait for Jira Cloud
use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use log::*;
use reqwest::{
    Client, Response, StatusCode, Url,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    Result,
    error::StewardError,
    forge::types::Lookup,
    jira::{
        IssueTracker,
        types::{CreateVersion, Issue, Transitions, Version},
    },
};

/// Connection settings for a Jira instance.
#[derive(Debug, Clone)]
pub struct JiraConnection {
    /// Instance URL, e.g. https://acme.atlassian.net
    pub base_url: String,
    /// Account email used for basic authentication.
    pub email: String,
    pub token: SecretString,
}

/// Jira REST v3 client.
pub struct JiraClient {
    client: Client,
    base_url: Url,
}

/// Return the response, mapping 404 to a not-found error naming `entity`.
fn check_response(response: Response, entity: &str) -> Result<Response> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(StewardError::not_found(entity));
    }

    Ok(response.error_for_status()?)
}

impl JiraClient {
    pub fn new(connection: JiraConnection) -> Result<Self> {
        let credentials = BASE64_STANDARD.encode(format!(
            "{}:{}",
            connection.email,
            connection.token.expose_secret()
        ));

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Basic {credentials}"))?;
        auth.set_sensitive(true);
        headers.append("Authorization", auth);
        headers.append("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(&format!(
            "{}/rest/api/3/",
            connection.base_url.trim_end_matches('/')
        ))?;

        Ok(Self { client, base_url })
    }

    async fn get_issue_status(&self, issue_key: &str) -> Result<String> {
        let url = self.base_url.join(&format!("issue/{issue_key}"))?;
        let response = self
            .client
            .get(url)
            .query(&[("fields", "status")])
            .send()
            .await?;
        let issue: Issue =
            check_response(response, &format!("jira issue {issue_key}"))?
                .json()
                .await?;
        Ok(issue.fields.status.name)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn find_release_version(
        &self,
        project_key: &str,
        name: &str,
    ) -> Result<Lookup<Version>> {
        let url = self.base_url.join(&format!("project/{project_key}/versions"))?;
        let response = self.client.get(url).send().await?;
        let versions: Vec<Version> =
            check_response(response, &format!("jira project {project_key}"))?
                .json()
                .await?;

        let mut matching = versions
            .into_iter()
            .filter(|v| v.name == name)
            .collect::<Vec<Version>>();

        if matching.len() > 1 {
            return Err(StewardError::ambiguous(format!(
                "found {} jira versions named '{name}' in project {project_key}",
                matching.len()
            )));
        }

        Ok(matching.pop().into())
    }

    async fn create_release_version(
        &self,
        project_key: &str,
        name: &str,
        description: &str,
    ) -> Result<Version> {
        info!("creating jira version '{name}' in project {project_key}");

        let url = self.base_url.join("version")?;
        let response = self
            .client
            .post(url)
            .json(&CreateVersion {
                name,
                description,
                project: project_key,
            })
            .send()
            .await?;

        let version: Version =
            check_response(response, &format!("jira project {project_key}"))?
                .json()
                .await?;

        Ok(version)
    }

    async fn attach_issue_to_version(
        &self,
        issue_key: &str,
        version_id: &str,
    ) -> Result<()> {
        debug!("adding fix version {version_id} to {issue_key}");

        let url = self.base_url.join(&format!("issue/{issue_key}"))?;
        let response = self
            .client
            .put(url)
            .json(&serde_json::json!({
                "update": {
                    "fixVersions": [{ "add": { "id": version_id } }]
                }
            }))
            .send()
            .await?;

        check_response(response, &format!("jira issue {issue_key}"))?;

        Ok(())
    }

    async fn transition_issue(
        &self,
        issue_key: &str,
        status: &str,
    ) -> Result<()> {
        let current = self.get_issue_status(issue_key).await?;

        if current.eq_ignore_ascii_case(status) {
            info!("{issue_key} is already in status '{current}': skipping");
            return Ok(());
        }

        let url = self.base_url.join(&format!("issue/{issue_key}/transitions"))?;
        let response = self.client.get(url.clone()).send().await?;
        let transitions: Transitions =
            check_response(response, &format!("jira issue {issue_key}"))?
                .json()
                .await?;

        let transition = transitions.leading_to(status).ok_or_else(|| {
            StewardError::precondition(format!(
                "no transition from '{current}' to '{status}' available for {issue_key}"
            ))
        })?;

        info!(
            "transitioning {issue_key} from '{current}' to '{status}' via '{}'",
            transition.name
        );

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "transition": { "id": transition.id }
            }))
            .send()
            .await?;

        check_response(response, &format!("jira issue {issue_key}"))?;

        Ok(())
    }
}
