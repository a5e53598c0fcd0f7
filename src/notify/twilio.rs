//! Twilio SMS channel
//!
//! Plain-text rendering of the same alerts. Alert and cleared lines go out as
//! separate texts; realtime status texts are optional and spaced out per
//! validator by `status-interval-secs`.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::render;
use super::{check_status, NotificationChannel, NotifyError};
use crate::alerts::ValidatorAlertNotification;
use crate::config::{Thresholds, TwilioConfig, ValidatorMonitor};
use crate::data::ValidatorStats;

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
}

pub struct TwilioChannel {
    client: reqwest::Client,
    config: TwilioConfig,
    thresholds: Thresholds,
    api_base: String,
    /// Last realtime status text per validator
    last_status: Mutex<HashMap<String, Instant>>,
}

impl TwilioChannel {
    pub fn new(config: TwilioConfig, thresholds: Thresholds) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config,
            thresholds,
            api_base: DEFAULT_API_BASE.to_string(),
            last_status: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.config.account_sid
        )
    }

    pub async fn send_sms(&self, body: &str) -> Result<(), NotifyError> {
        let form = [
            ("To", self.config.to.as_str()),
            ("From", self.config.from.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(self.endpoint_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await?;
        let response = check_status(response).await?;

        match response.json::<MessageResource>().await {
            Ok(MessageResource { sid: Some(sid) }) => tracing::debug!(sid = %sid, "SMS queued"),
            Ok(_) => tracing::debug!("SMS queued"),
            Err(e) => tracing::debug!(error = %e, "SMS queued, response not decoded"),
        }
        Ok(())
    }

    /// Whether a status text for `validator` is due, given the configured spacing
    fn status_due(&self, validator: &str) -> bool {
        let Some(secs) = self.config.status_interval_secs else {
            return false;
        };
        let interval = Duration::from_secs(secs);
        self.last_status
            .lock()
            .get(validator)
            .map(|sent| sent.elapsed() >= interval)
            .unwrap_or(true)
    }
}

#[async_trait]
impl NotificationChannel for TwilioChannel {
    fn name(&self) -> &'static str {
        "twilio"
    }

    async fn send_alert(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
        notification: &ValidatorAlertNotification,
    ) -> Result<(), NotifyError> {
        let title = render::title(validator, stats);

        if notification.has_alerts() {
            self.send_sms(&render::alerts_text(&title, &notification.alerts))
                .await?;
        }

        let cleared = notification.announced_clears();
        if !cleared.is_empty() {
            self.send_sms(&render::cleared_text(&title, cleared)).await?;
        }

        Ok(())
    }

    async fn update_status(
        &self,
        validator: &ValidatorMonitor,
        stats: &ValidatorStats,
    ) -> Result<Option<String>, NotifyError> {
        if !self.status_due(&validator.name) {
            return Ok(None);
        }

        let text = render::status_text(validator, stats, self.thresholds.recent_blocks_to_check);
        self.send_sms(&text).await?;
        self.last_status
            .lock()
            .insert(validator.name.clone(), Instant::now());

        Ok(None)
    }
}
