//! # bookshelf-database
//!
//! Persistence for users, books and role grants. The store traits in
//! [`store`] are what the rest of the workspace depends on; they are
//! implemented by the PostgreSQL repositories and by [`MemoryStore`].

pub mod memory;
pub mod postgres;
pub mod provider;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgBackend;
pub use provider::Database;
pub use store::{BookStore, PermissionStore, UserStore};
