use async_trait::async_trait;
use log::*;
use reqwest::{
    Client, Url,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    Result,
    error::StewardError,
    slack::{
        Notifier,
        types::{PostMessage, PostMessageResponse},
    },
};

const SLACK_API_URL: &str = "https://slack.com/api/";

pub struct SlackClient {
    client: Client,
    base_url: Url,
}

impl SlackClient {
    pub fn new(token: SecretString) -> Result<Self> {
        if token.expose_secret().is_empty() {
            return Err(StewardError::InvalidArgs(
                "must provide slack token".into(),
            ));
        }

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

        Ok(Self {
            client,
            base_url: Url::parse(SLACK_API_URL)?,
        })
    }
}

fn check_post_message(response: PostMessageResponse) -> Result<()> {
    if response.ok {
        return Ok(());
    }

    Err(StewardError::external(format!(
        "Slack API error: {}",
        response.error.unwrap_or_else(|| "unknown error".into())
    )))
}

#[async_trait]
impl Notifier for SlackClient {
    async fn send_user_message(&self, user_id: &str, text: &str) -> Result<()> {
        let url = self.base_url.join("chat.postMessage")?;

        debug!("sending slack message to {user_id}");

        // chat.postMessage to a user id opens the bot's DM with that user
        let response = self
            .client
            .post(url)
            .json(&PostMessage {
                channel: user_id,
                text,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<PostMessageResponse>()
            .await?;

        check_post_message(response)
    }
}
