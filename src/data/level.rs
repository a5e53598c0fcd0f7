use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a validator's condition, ordered ascending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertLevel {
    #[default]
    None,
    Warning,
    High,
    Critical,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::None => "none",
            AlertLevel::Warning => "warning",
            AlertLevel::High => "high",
            AlertLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator-level conditions, each tracked with its own counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    Jailed,
    Tombstoned,
    OutOfSync,
    BlockFetchFailure,
    MissedRecentBlocks,
    GenericRpc,
    Halt,
}

impl AlertType {
    /// Every alert type, in evaluation and reporting order
    pub const ALL: [AlertType; 7] = [
        AlertType::Jailed,
        AlertType::Tombstoned,
        AlertType::OutOfSync,
        AlertType::BlockFetchFailure,
        AlertType::MissedRecentBlocks,
        AlertType::GenericRpc,
        AlertType::Halt,
    ];

    /// Fixed severity contributed while the alert is active.
    ///
    /// `MissedRecentBlocks` is the floor only; the engine raises it to the
    /// level computed by the poller for the missed-block window.
    pub fn baseline_level(&self) -> AlertLevel {
        match self {
            AlertType::Jailed | AlertType::Tombstoned | AlertType::Halt => AlertLevel::Critical,
            AlertType::OutOfSync | AlertType::GenericRpc => AlertLevel::High,
            AlertType::BlockFetchFailure | AlertType::MissedRecentBlocks => AlertLevel::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Jailed => "jailed",
            AlertType::Tombstoned => "tombstoned",
            AlertType::OutOfSync => "out-of-sync",
            AlertType::BlockFetchFailure => "block-fetch-failure",
            AlertType::MissedRecentBlocks => "missed-recent-blocks",
            AlertType::GenericRpc => "generic-rpc",
            AlertType::Halt => "halt",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition reported for a single sentry; one value at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentryAlertType {
    #[default]
    None,
    GrpcError,
    OutOfSyncError,
    Halt,
}

impl SentryAlertType {
    pub fn is_healthy(&self) -> bool {
        matches!(self, SentryAlertType::None)
    }
}
