//! Book repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use bookshelf_core::error::{AppError, ErrorKind};
use bookshelf_core::result::AppResult;
use bookshelf_entity::{Book, BookUpdate, NewBook};

use crate::store::BookStore;

#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list books", e))
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find book", e))
    }

    async fn create(&self, book: NewBook) -> AppResult<Book> {
        // Two concurrent inserts can compute the same id; the loser hits the
        // primary key and surfaces as a conflict.
        sqlx::query_as::<_, Book>(
            "INSERT INTO books (id, title, description, created_by, updated_by) \
             SELECT COALESCE(MAX(id), 0) + 1, $1, $2, $3, $3 FROM books \
             RETURNING *",
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("books_pkey") => {
                AppError::conflict("Book id already taken, retry")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create book", e),
        })
    }

    async fn update(&self, id: i32, changes: BookUpdate) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET title = COALESCE($2, title), \
                              description = COALESCE($3, description), \
                              updated_by = $4, \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update book", e))?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete book", e))?;

        Ok(result.rows_affected() > 0)
    }
}
