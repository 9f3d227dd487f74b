//! # bookshelf-entity
//!
//! Domain entity models for Bookshelf. Every struct in this crate
//! represents a database table row or the input for creating or updating
//! one. Table rows additionally derive `sqlx::FromRow`.

pub mod access;
pub mod book;
pub mod user;

pub use access::AccessGrant;
pub use book::{Book, BookUpdate, NewBook};
pub use user::{NewUser, User, UserUpdate};
