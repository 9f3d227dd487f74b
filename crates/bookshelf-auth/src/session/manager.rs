//! Login and logout flows.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use bookshelf_core::error::AppError;
use bookshelf_database::UserStore;
use bookshelf_entity::User;

use super::issuer::{IssuedToken, TokenIssuer};
use super::store::SessionStore;
use crate::context::AuthorizedRequest;
use crate::password::PasswordHasher;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub issued: IssuedToken,
    pub user: User,
}

/// Orchestrates credential checks, token issuance and session revocation.
#[derive(Clone)]
pub struct SessionManager {
    hasher: Arc<PasswordHasher>,
    issuer: TokenIssuer,
    store: SessionStore,
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        hasher: Arc<PasswordHasher>,
        issuer: TokenIssuer,
        store: SessionStore,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            hasher,
            issuer,
            store,
            users,
        }
    }

    /// Verify credentials and issue a token, replacing any live session.
    ///
    /// Unknown emails and wrong passwords fail with the same message.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(subject_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .issuer
            .issue(user.id, &user.email, &user.name, &user.role)
            .await?;

        match self.users.set_active(user.id, true).await {
            Ok(()) => user.active = true,
            Err(e) => warn!(subject_id = %user.id, error = %e, "Failed to mark user active"),
        }

        info!(subject_id = %user.id, "Login successful");
        Ok(LoginResult { issued, user })
    }

    /// End the caller's session. Logging out twice is not an error.
    pub async fn logout(&self, request: &AuthorizedRequest) -> Result<(), AppError> {
        self.revoke(request.subject_id).await?;

        if let Err(e) = self.users.set_active(request.subject_id, false).await {
            warn!(subject_id = %request.subject_id, error = %e, "Failed to mark user inactive");
        }

        info!(subject_id = %request.subject_id, "Logout successful");
        Ok(())
    }

    /// Drop any live session for `subject_id`.
    pub async fn revoke(&self, subject_id: Uuid) -> Result<(), AppError> {
        self.store.delete(subject_id).await.map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use bookshelf_cache::memory::MemoryCacheProvider;
    use bookshelf_core::config::{AuthConfig, SessionConfig};
    use bookshelf_core::error::ErrorKind;
    use bookshelf_core::result::AppResult;
    use bookshelf_core::traits::CacheProvider;
    use bookshelf_database::MemoryStore;
    use bookshelf_entity::NewUser;
    use chrono::NaiveDate;

    use crate::error::AuthError;
    use crate::jwt::{JwtDecoder, JwtEncoder};
    use crate::session::TokenValidator;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..AuthConfig::default()
        }
    }

    struct Harness {
        sessions: SessionManager,
        validator: TokenValidator,
        users: Arc<MemoryStore>,
        hasher: Arc<PasswordHasher>,
    }

    fn harness_with_cache(cache: Arc<dyn CacheProvider>) -> Harness {
        let config = auth_config();
        let store = SessionStore::new(cache, &SessionConfig::default());
        let hasher = Arc::new(PasswordHasher::new(&config).unwrap());
        let issuer = TokenIssuer::new(
            Arc::new(JwtEncoder::new(&config).unwrap()),
            store.clone(),
            config.token_ttl_hours,
        )
        .unwrap();
        let validator =
            TokenValidator::new(Arc::new(JwtDecoder::new(&config).unwrap()), store.clone());
        let users = Arc::new(MemoryStore::with_default_grants());
        let sessions = SessionManager::new(hasher.clone(), issuer, store, users.clone());
        Harness {
            sessions,
            validator,
            users,
            hasher,
        }
    }

    fn harness() -> Harness {
        harness_with_cache(Arc::new(MemoryCacheProvider::default()))
    }

    async fn register(h: &Harness, email: &str, role: &str, password: &str) -> User {
        UserStore::create(
            h.users.as_ref(),
            NewUser {
                id: Uuid::new_v4(),
                name: "Alice".into(),
                email: email.into(),
                password_hash: h.hasher.hash(password).unwrap(),
                role: role.into(),
                details: String::new(),
                gender: String::new(),
                phone: String::new(),
                dob: Some(NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_round_trip_claims() {
        let h = harness();
        let user = register(&h, "alice@example.com", "editor", "pw").await;
        let login = h.sessions.login("alice@example.com", "pw").await.unwrap();
        let claims = h.validator.validate(&login.issued.token).await.unwrap();
        assert_eq!(claims.subject_id, user.id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "editor");
        assert!(login.user.active);
    }

    #[tokio::test]
    async fn test_alice_session_lifecycle() {
        let h = harness();
        register(&h, "alice@example.com", "editor", "pw").await;

        let t1 = h.sessions.login("alice@example.com", "pw").await.unwrap();
        h.validator.validate(&t1.issued.token).await.unwrap();

        let t2 = h.sessions.login("alice@example.com", "pw").await.unwrap();
        assert_ne!(t1.issued.token, t2.issued.token);
        assert_eq!(
            h.validator.validate(&t1.issued.token).await,
            Err(AuthError::TokenMismatch)
        );
        h.validator.validate(&t2.issued.token).await.unwrap();

        let request = AuthorizedRequest::from(t2.issued.claims.clone());
        h.sessions.logout(&request).await.unwrap();
        assert_eq!(
            h.validator.validate(&t2.issued.token).await,
            Err(AuthError::Revoked)
        );
        let user = h.users.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert!(!user.active);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let h = harness();
        register(&h, "bob@example.com", "viewer", "pw").await;
        let login = h.sessions.login("bob@example.com", "pw").await.unwrap();
        let request = AuthorizedRequest::from(login.issued.claims.clone());

        h.sessions.logout(&request).await.unwrap();
        h.sessions.logout(&request).await.unwrap();
        assert!(h.validator.validate(&login.issued.token).await.is_err());
    }

    #[tokio::test]
    async fn test_bad_credentials_are_uniform() {
        let h = harness();
        register(&h, "carol@example.com", "viewer", "pw").await;
        let wrong = h.sessions.login("carol@example.com", "nope").await.unwrap_err();
        let unknown = h.sessions.login("dave@example.com", "pw").await.unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::Unauthorized);
        assert_eq!(wrong.message, unknown.message);
    }

    #[derive(Debug)]
    struct DownCache;

    #[async_trait]
    impl CacheProvider for DownCache {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            Err(AppError::cache("redis down"))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::cache("redis down"))
        }
        async fn delete(&self, _key: &str) -> AppResult<()> {
            Err(AppError::cache("redis down"))
        }
        async fn exists(&self, _key: &str) -> AppResult<bool> {
            Err(AppError::cache("redis down"))
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_store_outage_degrades_login_but_blocks_validation() {
        let h = harness_with_cache(Arc::new(DownCache));
        register(&h, "erin@example.com", "editor", "pw").await;

        let login = h.sessions.login("erin@example.com", "pw").await.unwrap();
        assert!(!login.issued.token.is_empty());

        let result = h.validator.validate(&login.issued.token).await;
        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));

        let request = AuthorizedRequest::from(login.issued.claims.clone());
        let err = h.sessions.logout(&request).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
