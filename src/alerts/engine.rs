//! Alert escalation rules
//!
//! Every condition, validator-wide or per sentry, goes through the same
//! escalation step: a counter grows by one for each consecutive poll the
//! condition holds, an alert is raised when the counter first passes the
//! condition's threshold, a reminder is repeated every `notify_every` polls,
//! and a cleared line is produced on the first poll the condition is gone.

use super::notification::ValidatorAlertNotification;
use super::state::ValidatorAlertState;
use crate::config::Thresholds;
use crate::data::{AlertLevel, AlertType, SentryAlertType, ValidatorStats};

/// Outcome of one escalation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Counter just passed the threshold
    Raised,
    /// Still active at a reminder boundary
    Reminder,
    /// Condition gone after an alert had been raised
    Cleared,
    Quiet,
}

/// Advance `counter` for one poll.
///
/// The alert is raised when the counter reaches `threshold + 1`, so a
/// threshold of 0 raises on the first occurrence. A counter that resets
/// without having reached the raise point is cleared silently.
pub fn escalate(counter: &mut i64, active: bool, threshold: i64, notify_every: i64) -> Transition {
    let raise_at = threshold.max(0) + 1;

    if active {
        *counter += 1;
        if *counter == raise_at {
            Transition::Raised
        } else if *counter > raise_at && notify_every > 0 && *counter % notify_every == 0 {
            Transition::Reminder
        } else {
            Transition::Quiet
        }
    } else {
        let previous = std::mem::replace(counter, 0);
        if previous >= raise_at {
            Transition::Cleared
        } else {
            Transition::Quiet
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SentryCondition {
    GrpcError,
    OutOfSync,
    Halt,
}

impl SentryCondition {
    fn alert_line(&self, sentry: &str, height: i64) -> String {
        match self {
            SentryCondition::GrpcError => format!("Sentry {}: gRPC error", sentry),
            SentryCondition::OutOfSync => format!("Sentry {}: out of sync", sentry),
            SentryCondition::Halt => format!("Sentry {}: halted at height {}", sentry, height_text(height)),
        }
    }

    fn cleared_line(&self, sentry: &str) -> String {
        match self {
            SentryCondition::GrpcError => format!("Sentry {}: gRPC error resolved", sentry),
            SentryCondition::OutOfSync => format!("Sentry {}: back in sync", sentry),
            SentryCondition::Halt => format!("Sentry {}: no longer halted", sentry),
        }
    }
}

fn height_text(height: i64) -> String {
    if height > 0 {
        height.to_string()
    } else {
        "N/A".to_string()
    }
}

fn reminder(line: String, count: i64) -> String {
    format!("{} (ongoing for {} checks)", line, count)
}

/// Turns a validator's previous alert state and a fresh poll into the next
/// state plus the notification for this poll. Pure and infallible.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    thresholds: Thresholds,
}

impl DecisionEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn evaluate(
        &self,
        previous: &ValidatorAlertState,
        stats: &ValidatorStats,
    ) -> (ValidatorAlertState, ValidatorAlertNotification) {
        let mut state = previous.clone();
        let mut notification = ValidatorAlertNotification::default();

        let validator_advanced =
            !stats.rpc_error && stats.height > 0 && stats.height > previous.latest_block_checked;
        let halted = self.track_progress(&mut state, stats);

        self.evaluate_alert_types(&mut state, stats, halted, &mut notification);
        self.evaluate_missed_block_run(&mut state, stats, &mut notification);
        let sentry_alerting = self.evaluate_sentries(&mut state, stats, validator_advanced, &mut notification);

        notification.alert_level = self.overall_level(&state, stats, sentry_alerting);
        notification.notify_for_clear = !notification.cleared_alerts.is_empty();

        state.alert_type_counts.retain(|_, count| *count > 0);

        (state, notification)
    }

    /// Update heights and the stall counter; returns the halt predicate when
    /// the poll carried a usable height.
    fn track_progress(&self, state: &mut ValidatorAlertState, stats: &ValidatorStats) -> Option<bool> {
        if stats.last_signed_block_height > 0 {
            state.latest_block_signed = stats.last_signed_block_height;
        }
        if stats.rpc_error || stats.height <= 0 {
            return None;
        }

        if stats.height > state.latest_block_checked {
            state.height_stall_polls = 0;
        } else {
            state.height_stall_polls += 1;
        }
        state.latest_block_checked = stats.height;

        Some(state.height_stall_polls >= self.thresholds.halt_stall_polls.max(1))
    }

    /// Predicate for an alert type, `None` when this poll cannot tell
    fn condition(&self, alert_type: AlertType, stats: &ValidatorStats, halted: Option<bool>) -> Option<bool> {
        match alert_type {
            AlertType::GenericRpc => Some(stats.rpc_error),
            _ if stats.rpc_error => None,
            AlertType::Jailed => Some(stats.jailed),
            AlertType::Tombstoned => Some(stats.tombstoned),
            AlertType::OutOfSync => Some(stats.out_of_sync),
            AlertType::BlockFetchFailure => Some(stats.block_fetch_error),
            AlertType::MissedRecentBlocks => Some(
                stats.recent_missed_blocks >= self.thresholds.recent_missed_blocks_notify_threshold,
            ),
            AlertType::Halt => halted,
        }
    }

    fn alert_line(&self, alert_type: AlertType, stats: &ValidatorStats) -> String {
        match alert_type {
            AlertType::Jailed => "Validator is jailed".to_string(),
            AlertType::Tombstoned => "Validator is tombstoned".to_string(),
            AlertType::OutOfSync => "Validator node is out of sync".to_string(),
            AlertType::BlockFetchFailure => "Error fetching recent blocks".to_string(),
            AlertType::MissedRecentBlocks => format!(
                "Missed {}/{} recent blocks",
                stats.recent_missed_blocks, self.thresholds.recent_blocks_to_check
            ),
            AlertType::GenericRpc => "Error querying validator RPC".to_string(),
            AlertType::Halt => format!("Chain halted at height {}", height_text(stats.height)),
        }
    }

    fn cleared_line(alert_type: AlertType) -> &'static str {
        match alert_type {
            AlertType::Jailed => "Validator is no longer jailed",
            AlertType::Tombstoned => "Validator is no longer tombstoned",
            AlertType::OutOfSync => "Validator node is back in sync",
            AlertType::BlockFetchFailure => "Fetching recent blocks succeeded",
            AlertType::MissedRecentBlocks => "Validator is no longer missing recent blocks",
            AlertType::GenericRpc => "Validator RPC queries are succeeding again",
            AlertType::Halt => "Chain is no longer halted",
        }
    }

    fn evaluate_alert_types(
        &self,
        state: &mut ValidatorAlertState,
        stats: &ValidatorStats,
        halted: Option<bool>,
        notification: &mut ValidatorAlertNotification,
    ) {
        for alert_type in AlertType::ALL {
            let Some(active) = self.condition(alert_type, stats, halted) else {
                continue;
            };

            let counter = state.alert_type_counts.entry(alert_type).or_insert(0);
            match escalate(counter, active, 0, self.thresholds.notify_every) {
                Transition::Raised => notification.alerts.push(self.alert_line(alert_type, stats)),
                Transition::Reminder => {
                    let count = *counter;
                    notification
                        .alerts
                        .push(reminder(self.alert_line(alert_type, stats), count));
                }
                Transition::Cleared => notification
                    .cleared_alerts
                    .push(Self::cleared_line(alert_type).to_string()),
                Transition::Quiet => {}
            }
        }
    }

    /// Rollup of polls with any missed block, reported while below the
    /// missed-blocks alert threshold.
    fn evaluate_missed_block_run(
        &self,
        state: &mut ValidatorAlertState,
        stats: &ValidatorStats,
        notification: &mut ValidatorAlertNotification,
    ) {
        if stats.rpc_error {
            return;
        }
        if stats.recent_missed_blocks <= 0 {
            state.recent_missed_blocks_counter = 0;
            state.recent_missed_blocks_counter_max = 0;
            return;
        }

        state.recent_missed_blocks_counter += 1;
        state.recent_missed_blocks_counter_max = state
            .recent_missed_blocks_counter_max
            .max(stats.recent_missed_blocks);

        let every = self.thresholds.notify_every;
        let run = state.recent_missed_blocks_counter;
        if every > 0 && run % every == 0 && state.count(AlertType::MissedRecentBlocks) == 0 {
            notification.alerts.push(format!(
                "Missed blocks in {} consecutive checks, worst {}/{} recent blocks missed",
                run, state.recent_missed_blocks_counter_max, self.thresholds.recent_blocks_to_check
            ));
        }
    }

    /// Returns true when any sentry has a raised alert after this poll
    fn evaluate_sentries(
        &self,
        state: &mut ValidatorAlertState,
        stats: &ValidatorStats,
        validator_advanced: bool,
        notification: &mut ValidatorAlertNotification,
    ) -> bool {
        let t = &self.thresholds;
        let mut alerting = false;

        for sentry in &stats.sentry_stats {
            let last_height = state
                .sentry_latest_height
                .get(&sentry.name)
                .copied()
                .unwrap_or(0);
            let stalled = validator_advanced && sentry.height > 0 && sentry.height == last_height;

            let counters = state.sentry_counts.entry(sentry.name.clone()).or_default();
            let checks = [
                (
                    SentryCondition::GrpcError,
                    &mut counters.grpc_error,
                    sentry.alert_type == SentryAlertType::GrpcError,
                    t.sentry_grpc_error_notify_threshold,
                ),
                (
                    SentryCondition::OutOfSync,
                    &mut counters.out_of_sync,
                    sentry.alert_type == SentryAlertType::OutOfSyncError,
                    t.sentry_out_of_sync_error_notify_threshold,
                ),
                (
                    SentryCondition::Halt,
                    &mut counters.halt,
                    sentry.alert_type == SentryAlertType::Halt || stalled,
                    t.sentry_halt_error_notify_threshold,
                ),
            ];

            for (condition, counter, active, threshold) in checks {
                match escalate(counter, active, threshold, t.notify_every) {
                    Transition::Raised => notification
                        .alerts
                        .push(condition.alert_line(&sentry.name, sentry.height)),
                    Transition::Reminder => notification.alerts.push(reminder(
                        condition.alert_line(&sentry.name, sentry.height),
                        *counter,
                    )),
                    Transition::Cleared => notification
                        .cleared_alerts
                        .push(condition.cleared_line(&sentry.name)),
                    Transition::Quiet => {}
                }
                if *counter > threshold {
                    alerting = true;
                }
            }

            if sentry.height > 0 {
                state
                    .sentry_latest_height
                    .insert(sentry.name.clone(), sentry.height);
            }
        }

        alerting
    }

    fn overall_level(&self, state: &ValidatorAlertState, stats: &ValidatorStats, sentry_alerting: bool) -> AlertLevel {
        let mut level = stats.alert_level(&self.thresholds);

        for alert_type in state.active_alert_types() {
            let type_level = match alert_type {
                AlertType::MissedRecentBlocks => alert_type
                    .baseline_level()
                    .max(stats.recent_missed_block_alert_level),
                _ => alert_type.baseline_level(),
            };
            level = level.max(type_level);
        }
        if sentry_alerting {
            level = level.max(AlertLevel::High);
        }

        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SentryStats;
    use chrono::Utc;

    fn healthy(height: i64) -> ValidatorStats {
        ValidatorStats {
            timestamp: Utc::now(),
            height,
            last_signed_block_height: height,
            slashing_period_uptime: 99.99,
            ..Default::default()
        }
    }

    fn jailed(height: i64) -> ValidatorStats {
        ValidatorStats {
            jailed: true,
            ..healthy(height)
        }
    }

    #[test]
    fn test_escalate_counter_tracks_trailing_run() {
        let sequence = [true, true, false, true, false, false, true, true, true];
        let mut counter = 0;
        let mut run = 0;
        for active in sequence {
            escalate(&mut counter, active, 0, 20);
            run = if active { run + 1 } else { 0 };
            assert_eq!(counter, run);
        }
    }

    #[test]
    fn test_escalate_transitions() {
        let mut counter = 0;
        assert_eq!(escalate(&mut counter, true, 0, 20), Transition::Raised);
        for _ in 2..20 {
            assert_eq!(escalate(&mut counter, true, 0, 20), Transition::Quiet);
        }
        assert_eq!(escalate(&mut counter, true, 0, 20), Transition::Reminder);
        assert_eq!(counter, 20);
        assert_eq!(escalate(&mut counter, false, 0, 20), Transition::Cleared);
        assert_eq!(counter, 0);
        assert_eq!(escalate(&mut counter, false, 0, 20), Transition::Quiet);
    }

    #[test]
    fn test_escalate_threshold_filters_blips() {
        let mut counter = 0;
        assert_eq!(escalate(&mut counter, true, 1, 20), Transition::Quiet);
        assert_eq!(escalate(&mut counter, false, 1, 20), Transition::Quiet);
        assert_eq!(counter, 0);

        assert_eq!(escalate(&mut counter, true, 1, 20), Transition::Quiet);
        assert_eq!(escalate(&mut counter, true, 1, 20), Transition::Raised);
        assert_eq!(escalate(&mut counter, false, 1, 20), Transition::Cleared);
    }

    #[test]
    fn test_escalate_notify_every_one_does_not_double_report() {
        let mut counter = 0;
        assert_eq!(escalate(&mut counter, true, 0, 1), Transition::Raised);
        assert_eq!(escalate(&mut counter, true, 0, 1), Transition::Reminder);
    }

    #[test]
    fn test_new_alert_and_clear() {
        let engine = DecisionEngine::default();
        let state = ValidatorAlertState::default();

        let (state, notification) = engine.evaluate(&state, &jailed(100));
        assert_eq!(notification.alerts, vec!["Validator is jailed".to_string()]);
        assert!(notification.cleared_alerts.is_empty());
        assert_eq!(notification.alert_level, AlertLevel::Critical);
        assert_eq!(state.count(AlertType::Jailed), 1);

        let (state, notification) = engine.evaluate(&state, &healthy(101));
        assert!(notification.alerts.is_empty());
        assert_eq!(
            notification.cleared_alerts,
            vec!["Validator is no longer jailed".to_string()]
        );
        assert!(notification.notify_for_clear);
        assert_eq!(notification.alert_level, AlertLevel::None);
        assert_eq!(state.count(AlertType::Jailed), 0);
    }

    #[test]
    fn test_reminder_on_twentieth_poll_only() {
        let engine = DecisionEngine::default();
        let mut state = ValidatorAlertState::default();

        let (next, notification) = engine.evaluate(&state, &jailed(1));
        assert_eq!(notification.alerts.len(), 1);
        state = next;

        for cycle in 2..=20 {
            let (next, notification) = engine.evaluate(&state, &jailed(cycle));
            state = next;
            if cycle == 20 {
                assert_eq!(
                    notification.alerts,
                    vec!["Validator is jailed (ongoing for 20 checks)".to_string()]
                );
            } else {
                assert!(notification.is_empty(), "cycle {} notified", cycle);
            }
        }
        assert_eq!(state.count(AlertType::Jailed), 20);
    }

    #[test]
    fn test_cleared_state_is_idempotent() {
        let engine = DecisionEngine::default();
        let (state, _) = engine.evaluate(&ValidatorAlertState::default(), &jailed(10));
        let (mut state, notification) = engine.evaluate(&state, &healthy(11));
        assert_eq!(notification.cleared_alerts.len(), 1);

        for height in 12..20 {
            let (next, notification) = engine.evaluate(&state, &healthy(height));
            assert!(notification.is_empty());
            assert!(!notification.notify_for_clear);
            state = next;
        }
    }

    #[test]
    fn test_rpc_error_raises_high_and_freezes_other_counters() {
        let engine = DecisionEngine::default();
        let (state, _) = engine.evaluate(&ValidatorAlertState::default(), &jailed(10));

        let failed = ValidatorStats {
            rpc_error: true,
            ..Default::default()
        };
        let (state, notification) = engine.evaluate(&state, &failed);
        assert_eq!(notification.alerts, vec!["Error querying validator RPC".to_string()]);
        assert!(notification.cleared_alerts.is_empty());
        assert_eq!(state.count(AlertType::Jailed), 1);
        assert_eq!(state.count(AlertType::GenericRpc), 1);
        // jailed is still active, so critical wins over the RPC failure
        assert_eq!(notification.alert_level, AlertLevel::Critical);
        assert_eq!(state.latest_block_checked, 10);

        let (state, notification) = engine.evaluate(&state, &healthy(11));
        assert_eq!(
            notification.cleared_alerts,
            vec![
                "Validator is no longer jailed".to_string(),
                "Validator RPC queries are succeeding again".to_string(),
            ]
        );
        assert_eq!(state.active_alert_types().count(), 0);
    }

    #[test]
    fn test_missed_recent_blocks() {
        let engine = DecisionEngine::default();
        let missing = |height, missed, level| ValidatorStats {
            recent_missed_blocks: missed,
            recent_missed_block_alert_level: level,
            ..healthy(height)
        };

        let (state, notification) =
            engine.evaluate(&ValidatorAlertState::default(), &missing(50, 5, AlertLevel::Warning));
        assert!(notification.alerts.is_empty());
        assert_eq!(notification.alert_level, AlertLevel::Warning);
        assert_eq!(state.recent_missed_blocks_counter, 1);
        assert_eq!(state.recent_missed_blocks_counter_max, 5);

        let (state, notification) = engine.evaluate(&state, &missing(51, 12, AlertLevel::High));
        assert_eq!(notification.alerts, vec!["Missed 12/20 recent blocks".to_string()]);
        assert_eq!(notification.alert_level, AlertLevel::High);
        assert_eq!(state.recent_missed_blocks_counter, 2);
        assert_eq!(state.recent_missed_blocks_counter_max, 12);

        let (state, notification) = engine.evaluate(&state, &healthy(52));
        assert_eq!(
            notification.cleared_alerts,
            vec!["Validator is no longer missing recent blocks".to_string()]
        );
        assert_eq!(state.recent_missed_blocks_counter, 0);
        assert_eq!(state.recent_missed_blocks_counter_max, 0);
    }

    #[test]
    fn test_missed_block_rollup_below_threshold() {
        let engine = DecisionEngine::default();
        let mut state = ValidatorAlertState::default();
        let mut rollups = 0;

        for cycle in 1..=40 {
            let stats = ValidatorStats {
                recent_missed_blocks: if cycle == 7 { 4 } else { 1 },
                recent_missed_block_alert_level: AlertLevel::Warning,
                ..healthy(cycle)
            };
            let (next, notification) = engine.evaluate(&state, &stats);
            state = next;
            if !notification.alerts.is_empty() {
                rollups += 1;
                assert!(cycle == 20 || cycle == 40);
                assert!(notification.alerts[0].contains("worst 4/20"));
            }
        }
        assert_eq!(rollups, 2);
    }

    #[test]
    fn test_halt_after_stalled_height() {
        let engine = DecisionEngine::default();
        let (state, notification) = engine.evaluate(&ValidatorAlertState::default(), &healthy(100));
        assert!(notification.is_empty());

        let (state, notification) = engine.evaluate(&state, &healthy(100));
        assert_eq!(notification.alerts, vec!["Chain halted at height 100".to_string()]);
        assert_eq!(notification.alert_level, AlertLevel::Critical);
        assert_eq!(state.height_stall_polls, 1);

        let (state, notification) = engine.evaluate(&state, &healthy(101));
        assert_eq!(notification.cleared_alerts, vec!["Chain is no longer halted".to_string()]);
        assert_eq!(state.height_stall_polls, 0);
        assert_eq!(state.latest_block_checked, 101);
    }

    #[test]
    fn test_halt_stall_window_is_configurable() {
        let engine = DecisionEngine::new(Thresholds {
            halt_stall_polls: 3,
            ..Default::default()
        });
        let mut state = ValidatorAlertState::default();
        let mut raised_at = None;

        for poll in 1..=5 {
            let (next, notification) = engine.evaluate(&state, &healthy(500));
            state = next;
            if !notification.alerts.is_empty() && raised_at.is_none() {
                raised_at = Some(poll);
            }
        }
        // first poll establishes the height, then three stalled polls
        assert_eq!(raised_at, Some(4));
        assert_eq!(state.count(AlertType::Halt), 2);
    }

    #[test]
    fn test_unknown_height_does_not_touch_halt() {
        let engine = DecisionEngine::default();
        let (state, _) = engine.evaluate(&ValidatorAlertState::default(), &healthy(100));
        let (state, notification) = engine.evaluate(&state, &ValidatorStats::default());
        assert!(notification.is_empty());
        assert_eq!(state.count(AlertType::Halt), 0);
        assert_eq!(state.latest_block_checked, 100);
    }

    #[test]
    fn test_sentry_grpc_error_needs_two_polls() {
        let engine = DecisionEngine::default();
        let with_sentry = |height, alert_type| ValidatorStats {
            sentry_stats: vec![SentryStats::new("sentry-1", 0, alert_type)],
            ..healthy(height)
        };

        let (state, notification) = engine.evaluate(
            &ValidatorAlertState::default(),
            &with_sentry(1, SentryAlertType::GrpcError),
        );
        assert!(notification.is_empty());
        assert_eq!(state.sentry("sentry-1").grpc_error, 1);

        let (state, notification) = engine.evaluate(&state, &with_sentry(2, SentryAlertType::GrpcError));
        assert_eq!(notification.alerts, vec!["Sentry sentry-1: gRPC error".to_string()]);
        assert_eq!(notification.alert_level, AlertLevel::High);

        let (state, notification) = engine.evaluate(&state, &with_sentry(3, SentryAlertType::None));
        assert_eq!(
            notification.cleared_alerts,
            vec!["Sentry sentry-1: gRPC error resolved".to_string()]
        );
        assert!(state.sentry("sentry-1").is_zero());
    }

    #[test]
    fn test_sentry_single_blip_is_silent() {
        let engine = DecisionEngine::default();
        let poll = |height, alert_type| ValidatorStats {
            sentry_stats: vec![SentryStats::new("s", 0, alert_type)],
            ..healthy(height)
        };
        let (state, first) = engine.evaluate(
            &ValidatorAlertState::default(),
            &poll(1, SentryAlertType::OutOfSyncError),
        );
        let (state, second) = engine.evaluate(&state, &poll(2, SentryAlertType::None));
        assert!(first.is_empty());
        assert!(second.is_empty());
        assert!(state.sentry("s").is_zero());
    }

    #[test]
    fn test_sentry_stuck_height_is_halt() {
        let engine = DecisionEngine::default();
        let poll = |validator_height, sentry_height| ValidatorStats {
            sentry_stats: vec![SentryStats::new("relay", sentry_height, SentryAlertType::None)],
            ..healthy(validator_height)
        };

        let (state, _) = engine.evaluate(&ValidatorAlertState::default(), &poll(10, 10));
        let (state, first) = engine.evaluate(&state, &poll(11, 10));
        assert!(first.is_empty());
        assert_eq!(state.sentry("relay").halt, 1);

        let (state, second) = engine.evaluate(&state, &poll(12, 10));
        assert_eq!(second.alerts, vec!["Sentry relay: halted at height 10".to_string()]);

        let (state, third) = engine.evaluate(&state, &poll(13, 13));
        assert_eq!(third.cleared_alerts, vec!["Sentry relay: no longer halted".to_string()]);
        assert_eq!(state.sentry_latest_height.get("relay"), Some(&13));
    }

    #[test]
    fn test_absent_sentry_keeps_counters() {
        let engine = DecisionEngine::default();
        let failing = ValidatorStats {
            sentry_stats: vec![SentryStats::new("s", 0, SentryAlertType::GrpcError)],
            ..healthy(1)
        };
        let (state, _) = engine.evaluate(&ValidatorAlertState::default(), &failing);
        let (state, notification) = engine.evaluate(&state, &healthy(2));
        assert!(notification.is_empty());
        assert_eq!(state.sentry("s").grpc_error, 1);
    }

    #[test]
    fn test_level_never_below_active_alerts() {
        let engine = DecisionEngine::default();
        let stats = ValidatorStats {
            out_of_sync: true,
            block_fetch_error: true,
            slashing_period_uptime: 99.5,
            ..healthy(7)
        };
        let (state, notification) = engine.evaluate(&ValidatorAlertState::default(), &stats);
        for alert_type in state.active_alert_types() {
            assert!(notification.alert_level >= alert_type.baseline_level());
        }
        assert_eq!(notification.alert_level, AlertLevel::High);
        assert_eq!(notification.alerts.len(), 2);
    }

    #[test]
    fn test_uptime_contributes_to_level() {
        let engine = DecisionEngine::default();
        let stats = ValidatorStats {
            slashing_period_uptime: 95.0,
            ..healthy(7)
        };
        let (_, notification) = engine.evaluate(&ValidatorAlertState::default(), &stats);
        assert!(notification.is_empty());
        assert_eq!(notification.alert_level, AlertLevel::Critical);
    }
}
