//! Fixed configuration for the admission monitor.
//!
//! Every tunable is a compile-time constant. `MonitorConfig` bundles them so the
//! pipeline can be pointed at other endpoints in tests.

use std::time::Duration;

/// Page whose text decides the admission status.
pub const WEBSITE_URL: &str = "https://ampcode.com/news/amp-free-is-full-for-now";

/// Webhook that receives status alerts. Fill in the channel's id and token.
pub const WEBHOOK_URL: &str = "https://discord.com/api/webhooks/WEBHOOK_ID/WEBHOOK_TOKEN";

/// Delay between polling cycles (15 minutes).
pub const CHECK_INTERVAL: Duration = Duration::from_secs(900);

/// Timeout applied to each individual HTTP attempt.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Browser-like user agent sent with every page fetch.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Display name attached to every webhook message.
pub const WEBHOOK_USERNAME: &str = "AMP Monitor";

/// The webhook answers a successful post with 204 No Content.
pub const WEBHOOK_SUCCESS_STATUS: u16 = 204;

/// Maximum message length accepted by the webhook.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Number of characters of page text kept for diagnostics.
pub const SNIPPET_LEN: usize = 300;

/// Keyword marking the page as full. Matched against upper-cased text.
pub const FULL_KEYWORD: &str = "FULL";

/// Keywords suggesting admission is open. Matched against upper-cased text.
pub const OPEN_KEYWORDS: [&str; 3] = ["OPEN", "AVAILABLE", "ACCEPTING"];

/// Runtime view of the constants above.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub website_url: String,
    pub webhook_url: String,
    pub check_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub webhook_username: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            website_url: WEBSITE_URL.to_string(),
            webhook_url: WEBHOOK_URL.to_string(),
            check_interval: CHECK_INTERVAL,
            request_timeout: REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            webhook_username: WEBHOOK_USERNAME.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Check interval expressed in whole minutes, for human-facing text.
    pub fn interval_minutes(&self) -> u64 {
        self.check_interval.as_secs() / 60
    }
}
