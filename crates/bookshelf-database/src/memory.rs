//! In-process store backed by `dashmap`, used by tests and the `memory`
//! database provider.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use bookshelf_core::error::AppError;
use bookshelf_core::result::AppResult;
use bookshelf_entity::{AccessGrant, Book, BookUpdate, NewBook, NewUser, User, UserUpdate};

use crate::store::{BookStore, DEFAULT_GRANTS, PermissionStore, UserStore};

/// Users, books and grants held in memory. Users are keyed by lowercased email.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    books: DashMap<i32, Book>,
    grants: DashSet<AccessGrant>,
    /// Serializes book id allocation.
    book_ids: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the same grants as a fresh database.
    pub fn with_default_grants() -> Self {
        let store = Self::new();
        for (role, privilege) in DEFAULT_GRANTS {
            store.grant(*role, *privilege);
        }
        store
    }

    /// Add a `(role, privilege)` fact.
    pub fn grant(&self, role: impl Into<String>, privilege: impl Into<String>) {
        self.grants.insert(AccessGrant::new(role, privilege));
    }

    /// Remove a `(role, privilege)` fact.
    pub fn revoke(&self, role: &str, privilege: &str) {
        self.grants.remove(&AccessGrant::new(role, privilege));
    }
}

fn email_key(email: &str) -> String {
    email.to_lowercase()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        if self.users.iter().any(|entry| entry.value().id == user.id) {
            return Err(AppError::conflict("User id already in use"));
        }
        match self.users.entry(email_key(&user.email)) {
            Entry::Occupied(_) => Err(AppError::conflict("Email already in use")),
            Entry::Vacant(slot) => {
                let user = user.into_user(Utc::now());
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(&email_key(email)).map(|u| u.value().clone()))
    }

    async fn find_role_by_email(&self, email: &str) -> AppResult<Option<String>> {
        Ok(self
            .users
            .get(&email_key(email))
            .map(|u| u.value().role.clone()))
    }

    async fn list_emails(&self) -> AppResult<Vec<String>> {
        let mut emails: Vec<String> = self
            .users
            .iter()
            .map(|entry| entry.value().email.clone())
            .collect();
        emails.sort();
        Ok(emails)
    }

    async fn update(&self, email: &str, changes: UserUpdate) -> AppResult<User> {
        let mut user = self
            .users
            .get_mut(&email_key(email))
            .ok_or_else(|| AppError::not_found(format!("User {email} not found")))?;
        changes.apply_to(user.value_mut(), Utc::now());
        Ok(user.value().clone())
    }

    async fn delete(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.users.remove(&email_key(email)).map(|(_, user)| user))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let mut found = self
            .users
            .iter_mut()
            .find(|entry| entry.value().id == id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        let user = found.value_mut();
        user.active = active;
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self.books.iter().map(|e| e.value().clone()).collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.books.get(&id).map(|b| b.value().clone()))
    }

    async fn create(&self, book: NewBook) -> AppResult<Book> {
        let _guard = self
            .book_ids
            .lock()
            .map_err(|_| AppError::internal("Book id allocator poisoned"))?;
        let next_id = self.books.iter().map(|e| *e.key()).max().unwrap_or(0) + 1;
        let book = book.into_book(next_id, Utc::now());
        self.books.insert(next_id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i32, changes: BookUpdate) -> AppResult<Book> {
        let mut book = self
            .books
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))?;
        changes.apply_to(book.value_mut(), Utc::now());
        Ok(book.value().clone())
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.books.remove(&id).is_some())
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn count_permission(&self, role: &str, privilege: &str) -> AppResult<i64> {
        let found = self.grants.contains(&AccessGrant::new(role, privilege));
        Ok(i64::from(found))
    }
}
