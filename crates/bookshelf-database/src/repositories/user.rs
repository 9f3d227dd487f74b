//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bookshelf_core::error::{AppError, ErrorKind};
use bookshelf_core::result::AppResult;
use bookshelf_entity::{NewUser, User, UserUpdate};

use crate::store::UserStore;

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, details, gender, phone, dob) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.details)
        .bind(&user.gender)
        .bind(&user.phone)
        .bind(user.dob)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already in use")
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_pkey") => {
                AppError::conflict("User id already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn find_role_by_email(&self, email: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find role by email", e)
            })
    }

    async fn list_emails(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT email FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn update(&self, email: &str, changes: UserUpdate) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($2, name), \
                              details = COALESCE($3, details), \
                              gender = COALESCE($4, gender), \
                              phone = COALESCE($5, phone), \
                              password_hash = COALESCE($6, password_hash), \
                              updated_at = NOW() \
             WHERE LOWER(email) = LOWER($1) RETURNING *",
        )
        .bind(email)
        .bind(&changes.name)
        .bind(&changes.details)
        .bind(&changes.gender)
        .bind(&changes.phone)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {email} not found")))
    }

    async fn delete(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE LOWER(email) = LOWER($1) RETURNING *")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update active flag", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}
