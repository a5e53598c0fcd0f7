use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::level::{AlertLevel, SentryAlertType};
use crate::config::Thresholds;

/// Latest poll result for one sentry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentryStats {
    pub name: String,
    /// Reported software version, empty when unknown
    pub version: String,
    /// Reported height, 0 when unknown
    pub height: i64,
    pub alert_type: SentryAlertType,
}

impl SentryStats {
    pub fn new(name: impl Into<String>, height: i64, alert_type: SentryAlertType) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            height,
            alert_type,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Snapshot produced by the poller for one validator, once per cycle.
///
/// The default value is the "nothing known" snapshot: epoch timestamps and
/// zero heights, all of which render as N/A.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorStats {
    pub timestamp: DateTime<Utc>,
    pub height: i64,
    /// Blocks missed within the last `recent_blocks_to_check` blocks
    pub recent_missed_blocks: i64,
    /// -1 when the validator has not signed within the inspected range
    pub last_signed_block_height: i64,
    pub recent_missed_block_alert_level: AlertLevel,
    pub last_signed_block_timestamp: DateTime<Utc>,
    /// Rolling slashing-window uptime in percent, 0 when unknown
    pub slashing_period_uptime: f64,
    pub sentry_stats: Vec<SentryStats>,
    /// The RPC query for this validator failed
    pub rpc_error: bool,
    pub jailed: bool,
    pub tombstoned: bool,
    pub out_of_sync: bool,
    pub block_fetch_error: bool,
}

/// Timestamps before this instant are placeholders, not observations
pub fn unknown_time_cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

impl ValidatorStats {
    /// Whether the poll carries a real timestamp
    pub fn has_timestamp(&self) -> bool {
        self.timestamp >= unknown_time_cutoff()
    }

    pub fn sentry(&self, name: &str) -> Option<&SentryStats> {
        self.sentry_stats.iter().find(|s| s.name == name)
    }

    /// Level implied by the slashing-window uptime, `None` when unknown
    pub fn uptime_level(&self, thresholds: &Thresholds) -> AlertLevel {
        let uptime = self.slashing_period_uptime;
        if uptime <= 0.0 {
            AlertLevel::None
        } else if uptime < thresholds.slashing_period_uptime_error {
            AlertLevel::Critical
        } else if uptime < thresholds.slashing_period_uptime_warning {
            AlertLevel::Warning
        } else {
            AlertLevel::None
        }
    }

    /// Level of the snapshot on its own, without counter history.
    /// Drives the colour of realtime status messages.
    pub fn alert_level(&self, thresholds: &Thresholds) -> AlertLevel {
        let mut level = self.uptime_level(thresholds);
        if self.rpc_error {
            level = level.max(AlertLevel::High);
        }
        if self.recent_missed_blocks > 0 {
            level = level.max(self.recent_missed_block_alert_level);
        }
        level
    }
}
