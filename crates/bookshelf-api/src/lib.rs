//! # bookshelf-api
//!
//! HTTP layer for Bookshelf built on Axum. Public routes handle
//! registration, login and health; everything else runs behind the
//! request gate, which validates the session token and, for book routes,
//! checks the caller's role against the required privilege.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_state, serve};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
