//! Book entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A book record. Ids are sequential integers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    #[serde(rename = "bookid")]
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Email of the subject that created the record.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Email of the subject that last changed the record.
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a book. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub created_by: String,
}

impl NewBook {
    /// Build the stored row with the given id.
    pub fn into_book(self, id: i32, now: DateTime<Utc>) -> Book {
        Book {
            id,
            title: self.title,
            description: self.description,
            updated_by: self.created_by.clone(),
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes to an existing book.
#[derive(Debug, Clone)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_by: String,
}

impl BookUpdate {
    pub fn apply_to(self, book: &mut Book, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        book.updated_by = self.updated_by;
        book.updated_at = now;
    }
}
