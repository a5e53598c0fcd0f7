//! Message text shared by the notification channels
//!
//! Missing data (zero heights, empty versions, placeholder timestamps) is
//! rendered as "N/A" rather than treated as an error.

use chrono::{DateTime, Utc};

use crate::config::ValidatorMonitor;
use crate::data::{AlertLevel, ValidatorStats};

pub const COLOR_GOOD: u32 = 0x00FF00;
pub const COLOR_WARNING: u32 = 0xFFAC1C;
pub const COLOR_ERROR: u32 = 0xFF0000;
pub const COLOR_CRITICAL: u32 = 0x964B00;

pub const ICON_GOOD: &str = "🟢";
pub const ICON_WARNING: &str = "🟡";
pub const ICON_ERROR: &str = "🔴";

const NOT_AVAILABLE: &str = "N/A";

/// Relative timestamp token understood by the chat client
pub fn formatted_time(time: &DateTime<Utc>) -> String {
    format!("<t:{}:R>", time.timestamp())
}

pub fn color_for_level(level: AlertLevel) -> u32 {
    match level {
        AlertLevel::None => COLOR_GOOD,
        AlertLevel::Warning => COLOR_WARNING,
        AlertLevel::High => COLOR_ERROR,
        AlertLevel::Critical => COLOR_CRITICAL,
    }
}

fn icon_for_level(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::None => ICON_GOOD,
        AlertLevel::Warning => ICON_WARNING,
        AlertLevel::High | AlertLevel::Critical => ICON_ERROR,
    }
}

fn or_na(value: i64) -> String {
    if value == 0 {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

pub fn uptime_text(stats: &ValidatorStats) -> String {
    if stats.slashing_period_uptime > 0.0 {
        format!("{:.2}", stats.slashing_period_uptime)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// "name (99.95% up)"
pub fn title(vm: &ValidatorMonitor, stats: &ValidatorStats) -> String {
    format!("{} ({}% up)", vm.name, uptime_text(stats))
}

/// One line per configured sentry, in configuration order
fn sentry_lines(vm: &ValidatorMonitor, stats: &ValidatorStats) -> String {
    let mut out = String::new();

    for sentry in vm.sentries() {
        match stats.sentry(&sentry.name) {
            Some(sentry_stats) => {
                let icon = if sentry_stats.alert_type.is_healthy() {
                    ICON_GOOD
                } else {
                    ICON_ERROR
                };
                let version = if sentry_stats.version.is_empty() {
                    NOT_AVAILABLE
                } else {
                    sentry_stats.version.as_str()
                };
                out.push_str(&format!(
                    "\n{} **{}** - Height **{}** - Version **{}**",
                    icon,
                    sentry_stats.name,
                    or_na(sentry_stats.height),
                    version
                ));
            }
            None => out.push_str(&format!(
                "\n{} **{}** - Height **{}** - Version **{}**",
                ICON_ERROR, sentry.name, NOT_AVAILABLE, NOT_AVAILABLE
            )),
        }
    }

    out
}

/// Body of the realtime status message: chain height, last signed block,
/// signing in the recent window and one line per sentry.
pub fn status_description(vm: &ValidatorMonitor, stats: &ValidatorStats, recent_blocks_to_check: i64) -> String {
    let mut recent_signed_blocks = format!("{} Latest Blocks Signed: **{}**", ICON_WARNING, NOT_AVAILABLE);

    let latest_block = if !stats.has_timestamp() {
        format!("{} Height **{}**", ICON_ERROR, NOT_AVAILABLE)
    } else {
        let rpc_icon = if stats.rpc_error {
            ICON_ERROR
        } else {
            recent_signed_blocks = format!(
                "{} Latest Blocks Signed: **{}/{}**",
                icon_for_level(stats.recent_missed_block_alert_level),
                recent_blocks_to_check - stats.recent_missed_blocks,
                recent_blocks_to_check
            );
            ICON_GOOD
        };
        format!(
            "{} Height **{}** - **{}**",
            rpc_icon,
            stats.height,
            formatted_time(&stats.timestamp)
        )
    };

    let sentries = sentry_lines(vm, stats);

    if stats.height == stats.last_signed_block_height {
        return format!("{}\n{}{}", latest_block, recent_signed_blocks, sentries);
    }

    let last_signed = if stats.last_signed_block_height == -1 {
        format!("{} Last Signed **{}**", ICON_ERROR, NOT_AVAILABLE)
    } else {
        format!(
            "{} Last Signed **{}** - **{}**",
            ICON_ERROR,
            stats.last_signed_block_height,
            formatted_time(&stats.last_signed_block_timestamp)
        )
    };
    format!("{}\n{}\n{}{}", latest_block, last_signed, recent_signed_blocks, sentries)
}

/// Plain-text realtime status, title and body in one message
pub fn status_text(vm: &ValidatorMonitor, stats: &ValidatorStats, recent_blocks_to_check: i64) -> String {
    format!(
        "{} \n {}",
        title(vm, stats),
        status_description(vm, stats, recent_blocks_to_check)
    )
}

/// "• line" per entry, newline separated
pub fn bullets(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("• {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn alerts_text(title: &str, alerts: &[String]) -> String {
    format!("{}\n**Errors:**\n{}", title, bullets(alerts))
}

pub fn cleared_text(title: &str, cleared: &[String]) -> String {
    format!("{}\n**Errors cleared:**\n{}", title, bullets(cleared))
}
