//! Persisted monitor configuration
//!
//! The configuration file is the single durable record of the process: the
//! notification settings, the monitored validators and the few fields the
//! engine writes back (the pinned Discord status message per validator).

use serde::{Deserialize, Serialize};

/// Validator blocks inspected for missed signatures each poll
pub const RECENT_BLOCKS_TO_CHECK: i64 = 20;
/// Reminder interval in polls (~10 minutes at a 30 second cadence)
pub const NOTIFY_EVERY: i64 = 20;
pub const RECENT_MISSED_BLOCKS_NOTIFY_THRESHOLD: i64 = 10;
/// Consecutive sentry errors tolerated before notifying
pub const SENTRY_GRPC_ERROR_NOTIFY_THRESHOLD: i64 = 1;
pub const SENTRY_OUT_OF_SYNC_ERROR_NOTIFY_THRESHOLD: i64 = 1;
pub const SENTRY_HALT_ERROR_NOTIFY_THRESHOLD: i64 = 1;
pub const SLASHING_PERIOD_UPTIME_WARNING_THRESHOLD: f64 = 99.80;
pub const SLASHING_PERIOD_UPTIME_ERROR_THRESHOLD: f64 = 98.0;
pub const HALT_STALL_POLLS: i64 = 1;

/// Root of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HalfLifeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsConfig>,
    #[serde(default, skip_serializing_if = "Thresholds::is_default")]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub validators: Vec<ValidatorMonitor>,
}

impl HalfLifeConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn validator(&self, name: &str) -> Option<&ValidatorMonitor> {
        self.validators.iter().find(|v| v.name == name)
    }

    pub fn validator_mut(&mut self, name: &str) -> Option<&mut ValidatorMonitor> {
        self.validators.iter_mut().find(|v| v.name == name)
    }
}

/// Notification service selection and per-service credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationsConfig {
    /// "discord" or "twilio"
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<DiscordChannelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordWebhookConfig {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordChannelConfig {
    pub webhook: DiscordWebhookConfig,
    /// Users mentioned on alert messages
    #[serde(default)]
    pub alert_user_ids: Vec<String>,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub to: String,
    pub from: String,
    /// Minimum spacing of realtime status texts per validator; unset disables them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Sentry {
    pub name: String,
    pub grpc: String,
}

/// One monitored validator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidatorMonitor {
    pub name: String,
    pub rpc: String,
    pub address: String,
    pub chain_id: String,
    /// Status message edited in place by the Discord channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_status_message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentries: Option<Vec<Sentry>>,
}

impl ValidatorMonitor {
    pub fn sentries(&self) -> &[Sentry] {
        self.sentries.as_deref().unwrap_or(&[])
    }
}

/// Numeric thresholds of the escalation rules.
///
/// Every field defaults to its documented constant, so the `[thresholds]`
/// table may be omitted or partially filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Thresholds {
    pub recent_blocks_to_check: i64,
    pub notify_every: i64,
    pub recent_missed_blocks_notify_threshold: i64,
    pub sentry_grpc_error_notify_threshold: i64,
    pub sentry_out_of_sync_error_notify_threshold: i64,
    pub sentry_halt_error_notify_threshold: i64,
    pub slashing_period_uptime_warning: f64,
    pub slashing_period_uptime_error: f64,
    /// Consecutive polls without height progress before the chain counts as halted
    pub halt_stall_polls: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            recent_blocks_to_check: RECENT_BLOCKS_TO_CHECK,
            notify_every: NOTIFY_EVERY,
            recent_missed_blocks_notify_threshold: RECENT_MISSED_BLOCKS_NOTIFY_THRESHOLD,
            sentry_grpc_error_notify_threshold: SENTRY_GRPC_ERROR_NOTIFY_THRESHOLD,
            sentry_out_of_sync_error_notify_threshold: SENTRY_OUT_OF_SYNC_ERROR_NOTIFY_THRESHOLD,
            sentry_halt_error_notify_threshold: SENTRY_HALT_ERROR_NOTIFY_THRESHOLD,
            slashing_period_uptime_warning: SLASHING_PERIOD_UPTIME_WARNING_THRESHOLD,
            slashing_period_uptime_error: SLASHING_PERIOD_UPTIME_ERROR_THRESHOLD,
            halt_stall_polls: HALT_STALL_POLLS,
        }
    }
}

impl Thresholds {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Config serialization error: {0}")]
    Serialize(String),

    #[error("Unknown notification service: {0}")]
    UnknownService(String),

    #[error("Notification service {0} selected but not configured")]
    MissingService(String),
}
