//! Session store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server-side session record configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a session record in hours.
    #[serde(default = "default_record_ttl")]
    pub record_ttl_hours: u64,
    /// Key prefix for session records; the subject id is appended.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Upper bound on a single session store call in milliseconds.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            record_ttl_hours: default_record_ttl(),
            key_prefix: default_key_prefix(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

impl SessionConfig {
    /// Session record TTL as a [`Duration`].
    pub fn record_ttl(&self) -> Duration {
        Duration::from_secs(self.record_ttl_hours.saturating_mul(3600))
    }

    /// Store call timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

fn default_record_ttl() -> u64 {
    24
}

fn default_key_prefix() -> String {
    "jwt:".to_string()
}

fn default_store_timeout() -> u64 {
    2000
}
