//! Server-side session records, token issuance and validation, and the
//! login/logout flows built on them.

pub mod issuer;
pub mod manager;
pub mod store;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use issuer::{IssuedToken, TokenIssuer};
pub use manager::{LoginResult, SessionManager};
pub use store::SessionStore;
pub use validator::TokenValidator;
