//! Role resolution and privilege checks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use bookshelf_core::result::AppResult;
use bookshelf_database::{PermissionStore, UserStore};

use super::privilege::Privilege;
use crate::error::AuthError;

/// Decides whether a subject may perform a privileged operation.
///
/// Nothing is cached; every check reads the stores. Store failures and
/// timeouts deny access.
#[derive(Clone)]
pub struct AccessController {
    users: Arc<dyn UserStore>,
    permissions: Arc<dyn PermissionStore>,
    timeout: Duration,
}

impl std::fmt::Debug for AccessController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessController")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AccessController {
    pub fn new(
        users: Arc<dyn UserStore>,
        permissions: Arc<dyn PermissionStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            users,
            permissions,
            timeout,
        }
    }

    async fn bounded<T>(&self, op: impl Future<Output = AppResult<T>>) -> Result<T, AuthError> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AuthError::PermissionCheckFailed(e.message)),
            Err(_) => Err(AuthError::PermissionCheckFailed(format!(
                "timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    /// Current role of the user with `email`. An unknown user is denied.
    pub async fn resolve_role(&self, email: &str) -> Result<String, AuthError> {
        self.bounded(self.users.find_role_by_email(email))
            .await?
            .ok_or(AuthError::PermissionDenied)
    }

    /// Whether `role` holds `privilege`.
    pub async fn authorize(&self, role: &str, privilege: Privilege) -> Result<bool, AuthError> {
        let count = self
            .bounded(self.permissions.count_permission(role, privilege.as_str()))
            .await
            .inspect_err(|e| {
                warn!(role, privilege = %privilege, error = %e, "Permission check failed")
            })?;
        Ok(count > 0)
    }

    /// Resolve the subject's role and require `privilege`.
    pub async fn require(&self, email: &str, privilege: Privilege) -> Result<(), AuthError> {
        let role = self.resolve_role(email).await?;
        if self.authorize(&role, privilege).await? {
            Ok(())
        } else {
            debug!(role = %role, privilege = %privilege, "Permission denied");
            Err(AuthError::PermissionDenied)
        }
    }
}
