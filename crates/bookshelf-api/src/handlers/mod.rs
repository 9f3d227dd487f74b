//! Route handlers organized by domain.

pub mod auth;
pub mod book;
pub mod health;
pub mod user;
