//! Durable per-validator alert counters

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::data::AlertType;

/// Consecutive-error counters for one sentry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryCounters {
    pub grpc_error: i64,
    pub out_of_sync: i64,
    pub halt: i64,
}

impl SentryCounters {
    pub fn is_zero(&self) -> bool {
        self.grpc_error == 0 && self.out_of_sync == 0 && self.halt == 0
    }
}

/// Counters carried from one poll to the next for a single validator.
///
/// Every counter is the length of the current unbroken run of polls in which
/// its condition held, so it moves by at most one per poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorAlertState {
    pub alert_type_counts: BTreeMap<AlertType, i64>,
    pub sentry_counts: BTreeMap<String, SentryCounters>,
    pub sentry_latest_height: BTreeMap<String, i64>,
    /// Consecutive polls with at least one missed block in the window
    pub recent_missed_blocks_counter: i64,
    /// Worst missed count seen during the current run
    pub recent_missed_blocks_counter_max: i64,
    pub latest_block_checked: i64,
    pub latest_block_signed: i64,
    /// Consecutive successful polls without height progress
    pub height_stall_polls: i64,
}

impl ValidatorAlertState {
    pub fn count(&self, alert_type: AlertType) -> i64 {
        self.alert_type_counts.get(&alert_type).copied().unwrap_or(0)
    }

    pub fn sentry(&self, name: &str) -> SentryCounters {
        self.sentry_counts.get(name).copied().unwrap_or_default()
    }

    /// Drop counters and heights of sentries not in `configured`; returns
    /// how many sentries were dropped
    pub fn retain_sentries<'a>(&mut self, configured: impl IntoIterator<Item = &'a str>) -> usize {
        let keep: HashSet<&str> = configured.into_iter().collect();
        let before = self.sentry_counts.len();
        self.sentry_counts.retain(|name, _| keep.contains(name.as_str()));
        self.sentry_latest_height
            .retain(|name, _| keep.contains(name.as_str()));
        before - self.sentry_counts.len()
    }

    /// Alert types whose counter is currently positive
    pub fn active_alert_types(&self) -> impl Iterator<Item = AlertType> + '_ {
        AlertType::ALL.into_iter().filter(|t| self.count(*t) > 0)
    }
}

/// Holds the alert state of every monitored validator, keyed by name.
///
/// Validators never share state, and a single validator's polls run one
/// after another, so a sharded map is all the synchronization needed.
#[derive(Debug, Default)]
pub struct AlertStateStore {
    states: DashMap<String, ValidatorAlertState>,
}

impl AlertStateStore {
    pub fn new() -> Self {
        Self {
            states: DashMap::new(),
        }
    }

    /// Current state for a validator, zero-valued when never seen
    pub fn get(&self, validator: &str) -> ValidatorAlertState {
        self.states
            .get(validator)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Replace a validator's state, returning the previous one
    pub fn replace(&self, validator: &str, state: ValidatorAlertState) -> Option<ValidatorAlertState> {
        self.states.insert(validator.to_string(), state)
    }

    pub fn remove(&self, validator: &str) -> Option<ValidatorAlertState> {
        self.states.remove(validator).map(|(_, state)| state)
    }

    pub fn contains(&self, validator: &str) -> bool {
        self.states.contains_key(validator)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Copy of every state, for persistence
    pub fn snapshot(&self) -> HashMap<String, ValidatorAlertState> {
        self.states
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Load previously persisted states, overwriting any in memory
    pub fn restore(&self, states: HashMap<String, ValidatorAlertState>) {
        for (name, state) in states {
            self.states.insert(name, state);
        }
    }
}
