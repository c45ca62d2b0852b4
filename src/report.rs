//! User-facing reporting: Slack first, then the log.
use log::*;
use std::sync::Arc;

use crate::slack::Notifier;

/// Reports outcomes to the person who triggered a command, when known.
///
/// The Slack message always goes out before the log call so the user still
/// hears about the outcome if logging fails afterwards. Runs triggered by a
/// webhook have no requester and only log.
#[derive(Clone, Default)]
pub struct Reporter {
    notifier: Option<Arc<dyn Notifier>>,
    user_id: Option<String>,
}

impl Reporter {
    pub fn new(notifier: Arc<dyn Notifier>, user_id: impl Into<String>) -> Self {
        Self {
            notifier: Some(notifier),
            user_id: Some(user_id.into()),
        }
    }

    /// Reporter with no notification channel.
    pub fn log_only() -> Self {
        Self::default()
    }

    pub fn has_requester(&self) -> bool {
        self.notifier.is_some() && self.user_id.is_some()
    }

    async fn notify(&self, text: &str) {
        if let (Some(notifier), Some(user_id)) = (&self.notifier, &self.user_id)
            && let Err(err) = notifier.send_user_message(user_id, text).await
        {
            warn!("failed to notify {user_id} on slack: {err}");
        }
    }

    pub async fn report_error(&self, message: &str) {
        self.notify(&format!(":x: {message}")).await;
        error!("{message}");
    }

    pub async fn report_info(&self, message: &str) {
        self.notify(&format!(":white_check_mark: {message}")).await;
        info!("{message}");
    }
}
