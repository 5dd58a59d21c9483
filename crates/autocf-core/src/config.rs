//! Process configuration
//!
//! Settings are loaded once at startup from the environment and handed to
//! the pieces that need them; there is no ambient global.

use std::env;
use std::fmt;

use crate::error::{Error, Result};

/// Default Cloudflare API base URL
pub const DEFAULT_CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Process-wide settings, immutable after load
#[derive(Clone)]
pub struct Settings {
    /// Cloudflare account API key
    pub cloudflare_api_key: String,
    /// Cloudflare account email
    pub cloudflare_email: String,
    /// Cloudflare API base URL
    pub cloudflare_base_api: String,
    /// Telegram bot token for notifications
    pub telegram_token: String,
    /// Telegram chat to notify
    pub telegram_user_id: i64,
    /// Hostnames whose `A` records are kept proxied
    pub watched_common_records: Vec<String>,
    /// Hostnames whose `A` records are kept unproxied
    pub watched_nocached_records: Vec<String>,
    /// Log verbosity (trace, debug, info, warn or error)
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment, failing fast on missing
    /// or malformed values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings from an arbitrary key-value source.
    ///
    /// Every key is consulted in its upper-case spelling first, then as
    /// written, so `CLOUDFLARE_EMAIL` and `cloudflare_email` both work.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(&name.to_ascii_uppercase()).or_else(|| lookup(name));
        let require =
            |name: &str| get(name).ok_or_else(|| Error::config(format!("`{name}` is not set")));

        let raw_user_id = require("telegram_user_id")?;
        let telegram_user_id = raw_user_id.trim().parse::<i64>().map_err(|_| {
            Error::config(format!(
                "`telegram_user_id` is not an integer: {raw_user_id:?}"
            ))
        })?;

        let log_level = get("log_level").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        if !LOG_LEVELS.contains(&log_level.to_lowercase().as_str()) {
            return Err(Error::config(format!(
                "`log_level` must be one of {}; got {log_level:?}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(Self {
            cloudflare_api_key: require("cloudflare_api_key")?,
            cloudflare_email: require("cloudflare_email")?,
            cloudflare_base_api: get("cloudflare_base_api")
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API_BASE.to_string()),
            telegram_token: require("telegram_token")?,
            telegram_user_id,
            watched_common_records: get("watched_common_records")
                .map(|raw| parse_watch_list(&raw))
                .unwrap_or_default(),
            watched_nocached_records: get("watched_nocached_records")
                .map(|raw| parse_watch_list(&raw))
                .unwrap_or_default(),
            log_level,
        })
    }

    /// Both watch-lists as one membership view for the engine
    pub fn watchlist(&self) -> Watchlist {
        Watchlist {
            common: self.watched_common_records.clone(),
            nocached: self.watched_nocached_records.clone(),
        }
    }

    /// Hostnames present in both watch-lists.
    ///
    /// Such records end up unproxied because the nocached branch is checked
    /// first, which is usually a configuration mistake worth a warning.
    pub fn overlap(&self) -> Vec<&str> {
        self.watched_common_records
            .iter()
            .filter(|name| self.watched_nocached_records.contains(name))
            .map(String::as_str)
            .collect()
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("cloudflare_api_key", &"<REDACTED>")
            .field("cloudflare_email", &self.cloudflare_email)
            .field("cloudflare_base_api", &self.cloudflare_base_api)
            .field("telegram_token", &"<REDACTED>")
            .field("telegram_user_id", &self.telegram_user_id)
            .field("watched_common_records", &self.watched_common_records)
            .field("watched_nocached_records", &self.watched_nocached_records)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Parse a watch-list value that may be either a JSON array of strings or a
/// comma-separated list.
///
/// The structured form is tried first; when it does not parse, the value is
/// split on commas with surrounding whitespace trimmed and empty segments
/// dropped. Order is preserved either way.
pub fn parse_watch_list(raw: &str) -> Vec<String> {
    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed;
    }
    raw.split(',')
        .map(|segment| segment.trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Membership view over the configured watch-lists.
///
/// The engine consults `nocached` before `common`, so a hostname present in
/// both lists is treated as nocached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    /// Hostnames to keep proxied
    pub common: Vec<String>,
    /// Hostnames to keep unproxied
    pub nocached: Vec<String>,
}

impl Watchlist {
    /// Whether the hostname is on the keep-proxied list
    pub fn is_common(&self, name: &str) -> bool {
        self.common.iter().any(|candidate| candidate == name)
    }

    /// Whether the hostname is on the keep-unproxied list
    pub fn is_nocached(&self, name: &str) -> bool {
        self.nocached.iter().any(|candidate| candidate == name)
    }

    /// Union membership; records outside it are never touched
    pub fn is_known(&self, name: &str) -> bool {
        self.is_nocached(name) || self.is_common(name)
    }
}
