//! PostgreSQL implementations of the store traits.

pub mod access;
pub mod book;
pub mod user;

pub use access::AccessRepository;
pub use book::BookRepository;
pub use user::UserRepository;
