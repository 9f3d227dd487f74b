//! Role to privilege membership facts.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `(role, privilege)` row in the access table.
///
/// A role holds a privilege iff at least one matching row exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct AccessGrant {
    pub role: String,
    pub privilege: String,
}

impl AccessGrant {
    pub fn new(role: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            privilege: privilege.into(),
        }
    }
}
