//! Shared harness for HTTP integration tests.
//!
//! Builds the full router over the in-memory cache and stores and drives
//! it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use bookshelf_api::{AppState, build_router};
use bookshelf_cache::CacheManager;
use bookshelf_cache::memory::MemoryCacheProvider;
use bookshelf_core::config::AppConfig;
use bookshelf_core::error::AppError;
use bookshelf_core::result::AppResult;
use bookshelf_core::traits::cache::CacheProvider;
use bookshelf_database::{Database, MemoryStore, PermissionStore};

pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.argon2_memory_kib = 1024;
    config.auth.argon2_iterations = 1;
    config.cache.provider = "memory".to_string();
    config.database.provider = "memory".to_string();
    config
}

/// In-memory cache that can be switched off to simulate an outage.
#[derive(Debug, Default)]
pub struct SwitchableCache {
    inner: MemoryCacheProvider,
    down: AtomicBool,
}

impl SwitchableCache {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.down.load(Ordering::SeqCst) {
            Err(AppError::cache("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheProvider for SwitchableCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.check()?;
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.check()?;
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.down.load(Ordering::SeqCst))
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let cache = CacheManager::new(&config.cache).await.unwrap();
        Self::with_cache(cache)
    }

    pub fn with_cache(cache: CacheManager) -> Self {
        let store = Arc::new(MemoryStore::with_default_grants());
        Self::build(cache, Database::in_memory(Arc::clone(&store)), store)
    }

    /// Memory-backed app whose privilege checks go to `permissions`.
    pub async fn with_permissions(permissions: Arc<dyn PermissionStore>) -> Self {
        let cache = CacheManager::new(&test_config().cache).await.unwrap();
        let store = Arc::new(MemoryStore::with_default_grants());
        let mut database = Database::in_memory(Arc::clone(&store));
        database.permissions = permissions;
        Self::build(cache, database, store)
    }

    fn build(cache: CacheManager, database: Database, store: Arc<MemoryStore>) -> Self {
        let state = AppState::new(test_config(), cache, database).unwrap();

        Self {
            router: build_router(state.clone()),
            state,
            store,
        }
    }

    /// Send a request with an optional bearer token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Send a raw request.
    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn register(&self, email: &str, role: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "name": email.split('@').next().unwrap_or(email),
                "email": email,
                "password": PASSWORD,
                "role": role,
                "gender": "f",
                "dob": "1990-04-02",
            })),
        )
        .await
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Register a user and log them in.
    pub async fn user(&self, email: &str, role: &str) -> String {
        let registered = self.register(email, role).await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
        self.login(email).await
    }
}

/// Permission store whose backend is unreachable.
#[derive(Debug, Default)]
pub struct BrokenGrants;

#[async_trait]
impl PermissionStore for BrokenGrants {
    async fn count_permission(&self, _role: &str, _privilege: &str) -> AppResult<i64> {
        Err(AppError::database("connection reset by peer"))
    }
}

pub fn error_message(response: &TestResponse) -> &str {
    response.body["error"].as_str().unwrap_or_default()
}
