//! Store selection from configuration.

use std::sync::Arc;

use tracing::info;

use bookshelf_core::config::DatabaseConfig;
use bookshelf_core::error::AppError;
use bookshelf_core::result::AppResult;

use crate::memory::MemoryStore;
use crate::postgres::PgBackend;
use crate::repositories::{AccessRepository, BookRepository, UserRepository};
use crate::store::{BookStore, PermissionStore, UserStore};

/// The user, book and permission stores for one process, plus the
/// PostgreSQL pool backing them when that provider is selected.
#[derive(Clone)]
pub struct Database {
    pub users: Arc<dyn UserStore>,
    pub books: Arc<dyn BookStore>,
    pub permissions: Arc<dyn PermissionStore>,
    backend: Option<PgBackend>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open the stores named by `config.provider`.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let backend = PgBackend::open(config).await?;
                let pg = backend.pool().clone();
                Ok(Self {
                    users: Arc::new(UserRepository::new(pg.clone())),
                    books: Arc::new(BookRepository::new(pg.clone())),
                    permissions: Arc::new(AccessRepository::new(pg)),
                    backend: Some(backend),
                })
            }
            "memory" => {
                info!("Using in-memory store");
                Ok(Self::in_memory(Arc::new(MemoryStore::with_default_grants())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Serve every store from one [`MemoryStore`].
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            books: store.clone(),
            permissions: store,
            backend: None,
        }
    }

    /// Check connectivity. The memory provider is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.backend {
            Some(backend) => backend.ping().await,
            None => Ok(true),
        }
    }

    pub async fn close(&self) {
        if let Some(backend) = &self.backend {
            backend.close().await;
        }
    }
}
