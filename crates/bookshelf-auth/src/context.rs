//! Per-request identity handed to handlers after the gate passes.

use uuid::Uuid;

use crate::jwt::Claims;

/// The verified claim set of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedRequest {
    pub subject_id: Uuid,
    pub email: String,
    pub name: String,
    /// Role label as carried in the token.
    pub role: String,
}

impl From<Claims> for AuthorizedRequest {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.subject_id,
            email: claims.email,
            name: claims.name,
            role: claims.role,
        }
    }
}
