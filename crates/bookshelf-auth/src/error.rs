//! Authentication and authorization failures.

use bookshelf_core::error::AppError;
use thiserror::Error;

/// Message returned for every rejected token, whatever the cause.
pub const INVALID_TOKEN_MESSAGE: &str = "invalid or expired token";

/// Why a request failed to authenticate or authorize.
///
/// The token sub-cases are kept distinct for logging and tests but collapse
/// to a single `Unauthorized` when converted to [`AppError`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no token presented")]
    MissingToken,
    #[error("token signature or algorithm invalid")]
    InvalidSignature,
    #[error("token claims malformed")]
    MalformedToken,
    #[error("token expired")]
    Expired,
    #[error("no live session for subject")]
    Revoked,
    #[error("token superseded by a newer session")]
    TokenMismatch,
    #[error("permission denied")]
    PermissionDenied,
    #[error("permission check failed: {0}")]
    PermissionCheckFailed(String),
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => AppError::unauthorized("missing authorization token"),
            AuthError::InvalidSignature
            | AuthError::MalformedToken
            | AuthError::Expired
            | AuthError::Revoked
            | AuthError::TokenMismatch => AppError::unauthorized(INVALID_TOKEN_MESSAGE),
            AuthError::PermissionDenied => AppError::forbidden("permission denied"),
            AuthError::PermissionCheckFailed(msg) => {
                AppError::internal(format!("permission check failed: {msg}"))
            }
            AuthError::StoreUnavailable(msg) => {
                AppError::internal(format!("session store unavailable: {msg}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::error::ErrorKind;

    #[test]
    fn test_token_failures_are_indistinguishable() {
        let messages: Vec<String> = [
            AuthError::InvalidSignature,
            AuthError::MalformedToken,
            AuthError::Expired,
            AuthError::Revoked,
            AuthError::TokenMismatch,
        ]
        .into_iter()
        .map(|e| {
            let app: AppError = e.into();
            assert_eq!(app.kind, ErrorKind::Unauthorized);
            app.message
        })
        .collect();
        assert!(messages.iter().all(|m| m == INVALID_TOKEN_MESSAGE));
    }

    #[test]
    fn test_store_failures_fail_closed() {
        let app: AppError = AuthError::StoreUnavailable("timeout".into()).into();
        assert_eq!(app.kind, ErrorKind::Internal);
        let app: AppError = AuthError::PermissionCheckFailed("db".into()).into();
        assert_eq!(app.kind, ErrorKind::Internal);
        let app: AppError = AuthError::PermissionDenied.into();
        assert_eq!(app.kind, ErrorKind::Forbidden);
    }
}
