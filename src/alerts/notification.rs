use serde::{Deserialize, Serialize};

use crate::data::AlertLevel;

/// What one poll of one validator has to say
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorAlertNotification {
    /// Newly raised alerts and reminders for persisting ones
    pub alerts: Vec<String>,
    /// Alerts resolved this poll
    pub cleared_alerts: Vec<String>,
    /// Deliver `cleared_alerts`; the engine sets it whenever it cleared something
    pub notify_for_clear: bool,
    pub alert_level: AlertLevel,
}

impl ValidatorAlertNotification {
    /// No lines to deliver
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty() && self.cleared_alerts.is_empty()
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Cleared lines to deliver, empty unless `notify_for_clear` is set
    pub fn announced_clears(&self) -> &[String] {
        if self.notify_for_clear {
            &self.cleared_alerts
        } else {
            &[]
        }
    }
}
