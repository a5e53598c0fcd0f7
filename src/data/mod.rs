//! Poll snapshots and severity types shared by the engine and the channels

pub mod level;
pub mod stats;

pub use level::{AlertLevel, AlertType, SentryAlertType};
pub use stats::{unknown_time_cutoff, SentryStats, ValidatorStats};
