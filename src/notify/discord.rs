//! Discord webhook channel
//!
//! Alerts are posted as colored embeds. The realtime status of each
//! validator lives in a single message that is edited in place; its id is
//! handed back to the caller to be stored in the configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::render;
use super::{check_status, NotificationChannel, NotifyError};
use crate::alerts::ValidatorAlertNotification;
use crate::config::{DiscordChannelConfig, Thresholds, ValidatorMonitor};
use crate::data::{AlertLevel, ValidatorStats};

const DEFAULT_API_BASE: &str = "https://discord.com/api";

#[derive(Debug, Clone, Serialize)]
struct Embed {
    title: String,
    description: String,
    color: u32,
}

#[derive(Debug, Clone, Serialize)]
struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    embeds: Vec<Embed>,
}

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: String,
}

pub struct DiscordChannel {
    client: reqwest::Client,
    config: DiscordChannelConfig,
    thresholds: Thresholds,
    api_base: String,
}

impl DiscordChannel {
    pub fn new(config: DiscordChannelConfig, thresholds: Thresholds) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config,
            thresholds,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the channel at another API root (proxies, tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn webhook_url(&self) -> String {
        format!(
            "{}/webhooks/{}/{}",
            self.api_base, self.config.webhook.id, self.config.webhook.token
        )
    }

    fn message(&self, content: Option<String>, embed: Embed) -> WebhookMessage {
        let username = if self.config.username.is_empty() {
            None
        } else {
            Some(self.config.username.clone())
        };
        WebhookMessage {
            username,
            content,
            embeds: vec![embed],
        }
    }

    fn mentions(&self) -> Option<String> {
        if self.config.alert_user_ids.is_empty() {
            return None;
        }
        Some(
            self.config
                .alert_user_ids
                .iter()
                .map(|id| format!("<@{}>", id))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Post a message; with `wait` the created message id is returned
    async fn post(&self, message: &WebhookMessage, wait: bool) -> Result<Option<String>, NotifyError> {
        let mut request = self.client.post(self.webhook_url()).json(message);
        if wait {
            request = request.query(&[("wait", "true")]);
        }

        let response = check_status(request.send().await?).await?;
        if !wait {
            return Ok(None);
        }

        let created: CreatedMessage = response
            .json()
            .await
            .map_err(|e| NotifyError::Decode(e.to_string()))?;
        Ok(Some(created.id))
    }

    async fn edit(&self, message_id: &str, message: &WebhookMessage) -> Result<(), NotifyError> {
        let url = format!("{}/messages/{}", self.webhook_url(), message_id);
        let response = self.client.patch(url).json(message).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send_alert(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
        notification: &ValidatorAlertNotification,
    ) -> Result<(), NotifyError> {
        let title = render::title(validator, stats);

        if notification.has_alerts() {
            let embed = Embed {
                title: title.clone(),
                description: format!("**Errors:**\n{}", render::bullets(&notification.alerts)),
                color: render::color_for_level(notification.alert_level),
            };
            self.post(&self.message(self.mentions(), embed), false).await?;
            tracing::debug!(validator = %validator.name, count = notification.alerts.len(), "Discord alert sent");
        }

        let cleared = notification.announced_clears();
        if !cleared.is_empty() {
            let embed = Embed {
                title,
                description: format!("**Errors cleared:**\n{}", render::bullets(cleared)),
                color: render::color_for_level(AlertLevel::None),
            };
            self.post(&self.message(None, embed), false).await?;
            tracing::debug!(validator = %validator.name, count = cleared.len(), "Discord clear sent");
        }

        Ok(())
    }

    async fn update_status(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
    ) -> Result<Option<String>, NotifyError> {
        let embed = Embed {
            title: render::title(validator, stats),
            description: render::status_description(
                validator,
                stats,
                self.thresholds.recent_blocks_to_check,
            ),
            color: render::color_for_level(stats.alert_level(&self.thresholds)),
        };
        let message = self.message(None, embed);

        if let Some(message_id) = &validator.discord_status_message_id {
            match self.edit(message_id, &message).await {
                Ok(()) => return Ok(None),
                Err(NotifyError::Status { status: 404, .. }) => {
                    tracing::warn!(
                        validator = %validator.name,
                        message_id = %message_id,
                        "Status message no longer exists, posting a new one"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let id = self.post(&message, true).await?;
        if let Some(id) = &id {
            tracing::info!(validator = %validator.name, message_id = %id, "Posted new status message");
        }
        Ok(id)
    }
}
