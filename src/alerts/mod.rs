//! Alert escalation for monitored validators
//!
//! Tracks per-validator condition counters across polls and decides when an
//! alert is raised, repeated or cleared.

pub mod engine;
pub mod notification;
pub mod state;

pub use engine::{escalate, DecisionEngine, Transition};
pub use notification::ValidatorAlertNotification;
pub use state::{AlertStateStore, SentryCounters, ValidatorAlertState};
