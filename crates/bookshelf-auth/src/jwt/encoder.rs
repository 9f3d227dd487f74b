//! Token signing.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use bookshelf_core::config::AuthConfig;
use bookshelf_core::error::AppError;

use super::claims::Claims;

/// Signs claim sets with HMAC-SHA256.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    header: Header,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Create an encoder. An empty secret is a configuration error.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::configuration("JWT signing secret is not set"));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(Algorithm::HS256),
        })
    }

    /// Sign a claim set into a compact token string.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
