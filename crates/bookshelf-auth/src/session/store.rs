//! The one live token per subject, held in the cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use bookshelf_cache::keys;
use bookshelf_core::config::SessionConfig;
use bookshelf_core::result::AppResult;
use bookshelf_core::traits::CacheProvider;

use crate::error::AuthError;

/// Revocable record of the currently valid token for each subject.
///
/// Writing a record replaces any earlier one, so each subject has at most
/// one live session. Every call is bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<dyn CacheProvider>,
    key_prefix: String,
    record_ttl: Duration,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(cache: Arc<dyn CacheProvider>, config: &SessionConfig) -> Self {
        Self {
            cache,
            key_prefix: config.key_prefix.clone(),
            record_ttl: config.record_ttl(),
            timeout: config.store_timeout(),
        }
    }

    /// Default lifetime of a record written by [`Self::put`].
    pub fn record_ttl(&self) -> Duration {
        self.record_ttl
    }

    fn key(&self, subject_id: Uuid) -> String {
        keys::session_record(&self.key_prefix, subject_id)
    }

    async fn bounded<T>(&self, op: impl Future<Output = AppResult<T>>) -> Result<T, AuthError> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AuthError::StoreUnavailable(e.message)),
            Err(_) => Err(AuthError::StoreUnavailable(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    /// Record `token` as the live session for `subject_id`, replacing any other.
    pub async fn put(&self, subject_id: Uuid, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let key = self.key(subject_id);
        self.bounded(self.cache.set(&key, token, ttl)).await
    }

    /// The live token for `subject_id`, or `None` if absent or expired.
    pub async fn get(&self, subject_id: Uuid) -> Result<Option<String>, AuthError> {
        let key = self.key(subject_id);
        self.bounded(self.cache.get(&key)).await
    }

    /// Drop the record for `subject_id`. Deleting an absent record succeeds.
    pub async fn delete(&self, subject_id: Uuid) -> Result<(), AuthError> {
        let key = self.key(subject_id);
        self.bounded(self.cache.delete(&key)).await
    }
}
