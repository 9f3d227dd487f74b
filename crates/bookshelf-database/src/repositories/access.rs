//! Role grant lookups.

use async_trait::async_trait;
use sqlx::PgPool;

use bookshelf_core::error::{AppError, ErrorKind};
use bookshelf_core::result::AppResult;

use crate::store::PermissionStore;

/// Read-only access to the `access` table.
#[derive(Debug, Clone)]
pub struct AccessRepository {
    pool: PgPool,
}

impl AccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for AccessRepository {
    async fn count_permission(&self, role: &str, privilege: &str) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM access WHERE role = $1 AND privilege = $2",
        )
        .bind(role)
        .bind(privilege)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count permission grants", e)
        })
    }
}
