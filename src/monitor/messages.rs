//! Text of every message sent to the webhook

use chrono::{DateTime, Local};

use super::state::Transition;

/// Timestamp format used in alerts and check headers.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn startup_notice(interval_minutes: u64) -> String {
    format!(
        "🤖 AMP Monitor is now active! Checking every {interval_minutes} minutes for admission changes..."
    )
}

pub fn transition_alert(transition: Transition, website_url: &str, at: DateTime<Local>) -> String {
    match transition {
        Transition::Opened => format!(
            "🚨 **ALERT! AMP FREE IS NOW OPEN!** 🚨\n\n\
             The admission status has changed from FULL to OPEN!\n\
             Check it out now: {website_url}\n\n\
             Time detected: {}",
            timestamp(at)
        ),
        Transition::Reverted => format!(
            "⚠️ AMP Free has returned to FULL status.\nTime: {}",
            timestamp(at)
        ),
    }
}

pub fn stopped_notice() -> &'static str {
    "⚠️ AMP Monitor has been stopped manually."
}

pub fn crashed_notice(error: &str) -> String {
    format!("❌ AMP Monitor crashed with error: {error}")
}
