//! Cache fakes shared by the session tests.

use std::time::Duration;

use async_trait::async_trait;

use bookshelf_core::result::AppResult;
use bookshelf_core::traits::CacheProvider;

/// A cache that stalls on every call for far longer than the store timeout.
#[derive(Debug)]
pub struct StalledCache;

const STALL: Duration = Duration::from_secs(60);

#[async_trait]
impl CacheProvider for StalledCache {
    async fn get(&self, _key: &str) -> AppResult<Option<String>> {
        tokio::time::sleep(STALL).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
        tokio::time::sleep(STALL).await;
        Ok(())
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        tokio::time::sleep(STALL).await;
        Ok(())
    }

    async fn exists(&self, _key: &str) -> AppResult<bool> {
        tokio::time::sleep(STALL).await;
        Ok(false)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}
