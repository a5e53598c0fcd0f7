//! Notification channels
//!
//! A channel renders alert notifications and realtime status for a validator
//! into its own message format and delivers them. Delivery failures are
//! returned to the caller, which logs them and moves on.

pub mod discord;
pub mod render;
pub mod twilio;

pub use discord::DiscordChannel;
pub use twilio::TwilioChannel;

use std::sync::Arc;

use async_trait::async_trait;

use crate::alerts::ValidatorAlertNotification;
use crate::config::{ConfigError, NotificationsConfig, Thresholds, ValidatorMonitor};
use crate::data::ValidatorStats;

/// A destination for validator alerts and status updates
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Deliver the alert and cleared lines of one poll
    async fn send_alert(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
        notification: &ValidatorAlertNotification,
    ) -> Result<(), NotifyError>;

    /// Publish the realtime status of a validator.
    ///
    /// Returns the identifier of a newly created status message when the
    /// channel tracks one; the caller stores it in the validator's config.
    async fn update_status(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
    ) -> Result<Option<String>, NotifyError>;
}

impl NotificationsConfig {
    /// Instantiate the channel selected by `service`
    pub fn build_channels(
        &self,
        thresholds: &Thresholds,
    ) -> Result<Vec<Arc<dyn NotificationChannel>>, ConfigError> {
        let service = self.service.trim().to_ascii_lowercase();
        let channel: Arc<dyn NotificationChannel> = match service.as_str() {
            "discord" => {
                let config = self
                    .discord
                    .clone()
                    .ok_or_else(|| ConfigError::MissingService(service.clone()))?;
                Arc::new(DiscordChannel::new(config, thresholds.clone()))
            }
            "twilio" => {
                let config = self
                    .twilio
                    .clone()
                    .ok_or_else(|| ConfigError::MissingService(service.clone()))?;
                Arc::new(TwilioChannel::new(config, thresholds.clone()))
            }
            _ => return Err(ConfigError::UnknownService(self.service.clone())),
        };

        Ok(vec![channel])
    }
}

/// Notification delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Transport(e.to_string())
    }
}

/// Turn a non-2xx response into a `NotifyError::Status`
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, NotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::Status {
        status: status.as_u16(),
        body,
    })
}
