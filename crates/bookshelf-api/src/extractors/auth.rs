//! `AuthUser` extractor. Reads the identity the request gate attached.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use bookshelf_auth::{AuthError, AuthorizedRequest};

use crate::error::ApiError;

/// The verified caller of a gated route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthorizedRequest);

impl std::ops::Deref for AuthUser {
    type Target = AuthorizedRequest;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present when the route is behind the request gate.
        parts
            .extensions
            .get::<AuthorizedRequest>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
