//! Per-request token validation.

use std::sync::Arc;

use tracing::debug;

use super::store::SessionStore;
use crate::error::AuthError;
use crate::jwt::{Claims, JwtDecoder};

/// Checks a presented token's signature, expiry and session record.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    decoder: Arc<JwtDecoder>,
    store: SessionStore,
}

impl TokenValidator {
    pub fn new(decoder: Arc<JwtDecoder>, store: SessionStore) -> Self {
        Self { decoder, store }
    }

    /// Validate `token` and return its claims.
    ///
    /// The token must verify, be unexpired, and be exactly the token
    /// recorded as its subject's live session.
    pub async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decoder.decode(token)?;

        match self.store.get(claims.subject_id).await? {
            None => {
                debug!(subject_id = %claims.subject_id, "No live session for token");
                Err(AuthError::Revoked)
            }
            Some(current) if current != token => {
                debug!(subject_id = %claims.subject_id, "Token superseded by newer session");
                Err(AuthError::TokenMismatch)
            }
            Some(_) => Ok(claims),
        }
    }
}
