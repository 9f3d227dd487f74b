//! PostgreSQL backend: pool setup, schema migrations and liveness.

use std::time::Duration;

use sqlx::Connection;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info};

use bookshelf_core::config::DatabaseConfig;
use bookshelf_core::error::{AppError, ErrorKind};

/// Users, books and access grants.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

const APPLICATION_NAME: &str = "bookshelf";

/// Connection pool behind the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    /// Connect and, when `run_migrations` is set, bring the schema up to date.
    ///
    /// The first connection and every later acquire give up after
    /// `connect_timeout_seconds`.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options = connect_options(config)?;
        info!(
            target = %describe(&options),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to connect to PostgreSQL", e)
            })?;

        let backend = Self { pool };
        if config.run_migrations {
            backend.migrate().await?;
        }
        Ok(backend)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn migrate(&self) -> Result<(), AppError> {
        for migration in MIGRATOR.iter() {
            debug!(
                version = migration.version,
                description = %migration.description,
                "Known schema migration"
            );
        }

        MIGRATOR.run(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to apply schema migrations", e)
        })?;

        info!(known = MIGRATOR.iter().count(), "Schema up to date");
        Ok(())
    }

    /// Round-trip one pooled connection.
    pub async fn ping(&self) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "No database connection available", e)
        })?;
        conn.ping()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))?;
        Ok(true)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, AppError> {
    let options: PgConnectOptions = config.url.parse().map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "database.url is not a PostgreSQL URL", e)
    })?;
    Ok(options.application_name(APPLICATION_NAME))
}

/// `user@host:port/database`, never the password.
fn describe(options: &PgConnectOptions) -> String {
    format!(
        "{}@{}:{}/{}",
        options.get_username(),
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or("-")
    )
}
