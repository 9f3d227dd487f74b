//! # bookshelf-auth
//!
//! Authentication and authorization for Bookshelf.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing
//! - `jwt`: signed session token claims, encoding and decoding
//! - `session`: session records, token issuance and validation, login/logout
//! - `rbac`: role resolution and privilege checks against the access table

pub mod context;
pub mod error;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use context::AuthorizedRequest;
pub use error::AuthError;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use rbac::{AccessController, Privilege};
pub use session::{IssuedToken, SessionManager, SessionStore, TokenIssuer, TokenValidator};
