//! Direct messages to Slack users.

/// Web API client implementation.
pub mod client;

/// Wire types for the Slack Web API.
pub mod types;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;

/// Sends direct messages to a person.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_user_message(&self, user_id: &str, text: &str) -> Result<()>;
}
