//! Halflife: validator alerting and notification dispatch
//!
//! Watches validators of a Cosmos-style chain and turns each poll into alerts
//! that are raised, repeated and cleared with hysteresis, so a flapping
//! condition does not page anyone while a persistent one keeps reminding.
//!
//! # Features
//!
//! - **Escalation**: Per-condition counters with raise thresholds and periodic reminders
//! - **Sentries**: gRPC, sync and halt tracking for every sentry node
//! - **Missed-block rollup**: Periodic summary of short missed-block runs
//! - **Severity**: One overall alert level per notification
//! - **Channels**: Discord webhook embeds and Twilio SMS
//! - **Persistence**: Configuration and alert state survive restarts
//!
//! # Example
//!
//! ```no_run
//! use halflife::alerts::{AlertStateStore, DecisionEngine};
//! use halflife::data::ValidatorStats;
//!
//! let engine = DecisionEngine::default();
//! let store = AlertStateStore::new();
//!
//! let stats = ValidatorStats {
//!     height: 100,
//!     jailed: true,
//!     ..Default::default()
//! };
//! let (state, notification) = engine.evaluate(&store.get("val"), &stats);
//! store.replace("val", state);
//! println!("{:?}", notification.alerts);
//! ```

pub mod alerts;
pub mod config;
pub mod data;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod persistence;

// Re-export commonly used types
pub use alerts::{AlertStateStore, DecisionEngine, ValidatorAlertNotification, ValidatorAlertState};
pub use config::{ConfigError, HalfLifeConfig, Thresholds, ValidatorMonitor};
pub use data::{AlertLevel, AlertType, ValidatorStats};
pub use monitor::{Monitor, MonitorHandle, StatsSource};
pub use notify::{NotificationChannel, NotifyError};
pub use persistence::{PersistenceCoordinator, PersistenceError};
