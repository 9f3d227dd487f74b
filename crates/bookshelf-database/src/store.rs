//! Collaborator interfaces over user, book and permission persistence.

use async_trait::async_trait;
use uuid::Uuid;

use bookshelf_core::result::AppResult;
use bookshelf_entity::{Book, BookUpdate, NewBook, NewUser, User, UserUpdate};

/// Role grants installed with a fresh database.
pub const DEFAULT_GRANTS: &[(&str, &str)] = &[
    ("admin", "book_read"),
    ("admin", "book_create"),
    ("admin", "book_update"),
    ("admin", "book_delete"),
    ("editor", "book_read"),
    ("editor", "book_create"),
    ("editor", "book_update"),
    ("viewer", "book_read"),
];

/// User records. Emails are matched case-insensitively.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a user. A duplicate email is a `Conflict`.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// The role label of the user with this email, if any.
    async fn find_role_by_email(&self, email: &str) -> AppResult<Option<String>>;

    /// Emails of all users, sorted.
    async fn list_emails(&self) -> AppResult<Vec<String>>;

    /// Apply profile changes. An unknown email is `NotFound`.
    async fn update(&self, email: &str, changes: UserUpdate) -> AppResult<User>;

    /// Remove a user, returning the removed record.
    async fn delete(&self, email: &str) -> AppResult<Option<User>>;

    /// Flag whether the user currently has a session.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()>;
}

/// Book records with sequential integer ids.
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// All books ordered by id.
    async fn list(&self) -> AppResult<Vec<Book>>;

    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    /// Insert a book with id `max(id) + 1`.
    async fn create(&self, book: NewBook) -> AppResult<Book>;

    /// Apply changes. An unknown id is `NotFound`.
    async fn update(&self, id: i32, changes: BookUpdate) -> AppResult<Book>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Read-only role to privilege facts.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Number of `(role, privilege)` rows.
    async fn count_permission(&self, role: &str, privilege: &str) -> AppResult<i64>;
}
