//! Core traits defined in `bookshelf-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
