//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use bookshelf_auth::{
    AccessController, JwtDecoder, JwtEncoder, PasswordHasher, SessionManager, SessionStore,
    TokenIssuer, TokenValidator,
};
use bookshelf_cache::CacheManager;
use bookshelf_core::config::AppConfig;
use bookshelf_core::result::AppResult;
use bookshelf_database::Database;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Cache manager (Redis or in-memory) backing session records
    pub cache: Arc<CacheManager>,
    /// User, book and permission stores
    pub database: Database,

    // ── Auth ─────────────────────────────────────────────────
    pub password_hasher: Arc<PasswordHasher>,
    pub token_validator: Arc<TokenValidator>,
    pub access_controller: Arc<AccessController>,
    pub session_manager: Arc<SessionManager>,
}

impl AppState {
    /// Wire the auth components over the given cache and stores.
    ///
    /// Fails if the signing secret is missing or the hashing parameters
    /// are invalid.
    pub fn new(config: AppConfig, cache: CacheManager, database: Database) -> AppResult<Self> {
        let password_hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth)?);
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth)?);

        let cache = Arc::new(cache);
        let session_store = SessionStore::new(cache.provider(), &config.session);

        let token_issuer = TokenIssuer::new(
            jwt_encoder,
            session_store.clone(),
            config.auth.token_ttl_hours,
        )?;
        let token_validator = Arc::new(TokenValidator::new(jwt_decoder, session_store.clone()));
        let access_controller = Arc::new(AccessController::new(
            Arc::clone(&database.users),
            Arc::clone(&database.permissions),
            config.session.store_timeout(),
        ));
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&password_hasher),
            token_issuer,
            session_store,
            Arc::clone(&database.users),
        ));

        Ok(Self {
            config: Arc::new(config),
            cache,
            database,
            password_hasher,
            token_validator,
            access_controller,
            session_manager,
        })
    }
}
