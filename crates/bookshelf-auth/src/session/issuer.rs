//! Token issuance.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info};
use uuid::Uuid;

use bookshelf_core::error::AppError;

use super::store::SessionStore;
use crate::jwt::{Claims, JwtEncoder};

/// A freshly signed token and its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at_utc()
    }
}

/// Signs session tokens and records each as its subject's live session.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    encoder: Arc<JwtEncoder>,
    store: SessionStore,
    token_ttl: TimeDelta,
}

impl TokenIssuer {
    /// Fails with a configuration error if the lifetime is zero or does
    /// not fit a timestamp offset.
    pub fn new(
        encoder: Arc<JwtEncoder>,
        store: SessionStore,
        token_ttl_hours: u64,
    ) -> Result<Self, AppError> {
        let token_ttl = i64::try_from(token_ttl_hours)
            .ok()
            .filter(|hours| *hours > 0)
            .and_then(TimeDelta::try_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                AppError::configuration(format!("Invalid token lifetime: {token_ttl_hours} hours"))
            })?;

        Ok(Self {
            encoder,
            store,
            token_ttl,
        })
    }

    /// Sign a token for the subject and make it the subject's only live session.
    ///
    /// A failed session write is logged and the token is still returned.
    pub async fn issue(
        &self,
        subject_id: Uuid,
        email: &str,
        name: &str,
        role: &str,
    ) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| AppError::configuration("Token lifetime overflows the clock"))?;
        let claims = Claims {
            subject_id,
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            expires_at: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = self.encoder.encode(&claims)?;

        match self.store.put(subject_id, &token, self.store.record_ttl()).await {
            Ok(()) => info!(subject_id = %subject_id, "Session token issued"),
            Err(e) => error!(
                subject_id = %subject_id,
                error = %e,
                "Session record write failed; token issued without a revocable record"
            ),
        }

        Ok(IssuedToken { token, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bookshelf_cache::memory::MemoryCacheProvider;
    use bookshelf_core::config::{AuthConfig, MAX_TTL_HOURS, SessionConfig};
    use bookshelf_core::error::ErrorKind;

    use crate::error::AuthError;
    use crate::jwt::JwtDecoder;
    use crate::session::testing::StalledCache;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "issuer-test-secret".into(),
            ..AuthConfig::default()
        }
    }

    fn memory_store() -> SessionStore {
        SessionStore::new(
            Arc::new(MemoryCacheProvider::default()),
            &SessionConfig::default(),
        )
    }

    fn issuer(store: SessionStore, hours: u64) -> Result<TokenIssuer, AppError> {
        TokenIssuer::new(
            Arc::new(JwtEncoder::new(&auth_config()).unwrap()),
            store,
            hours,
        )
    }

    #[test]
    fn test_out_of_range_lifetime_is_a_configuration_error() {
        for hours in [0, 10_000_000_000_000, u64::MAX] {
            let err = issuer(memory_store(), hours).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration);
        }
        assert!(issuer(memory_store(), MAX_TTL_HOURS).is_ok());
    }

    #[tokio::test]
    async fn test_expiry_is_issuance_plus_lifetime() {
        let store = memory_store();
        let issued = issuer(store.clone(), 24)
            .unwrap()
            .issue(Uuid::new_v4(), "a@example.com", "A", "editor")
            .await
            .unwrap();

        assert_eq!(issued.claims.expires_at - issued.claims.iat, 24 * 3600);
        let decoder = JwtDecoder::new(&auth_config()).unwrap();
        assert_eq!(decoder.decode(&issued.token).unwrap(), issued.claims);
        assert_eq!(
            store.get(issued.claims.subject_id).await.unwrap().as_deref(),
            Some(issued.token.as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_still_yields_a_token() {
        let store = SessionStore::new(Arc::new(StalledCache), &SessionConfig::default());
        let issued = issuer(store.clone(), 24)
            .unwrap()
            .issue(Uuid::new_v4(), "a@example.com", "A", "editor")
            .await
            .unwrap();

        let decoder = JwtDecoder::new(&auth_config()).unwrap();
        assert_eq!(decoder.decode(&issued.token).unwrap().role, "editor");

        let lookup = store.get(issued.claims.subject_id).await;
        assert!(matches!(lookup, Err(AuthError::StoreUnavailable(_))));
    }
}

