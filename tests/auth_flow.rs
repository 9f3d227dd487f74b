//! Registration, login, session and profile flows over HTTP.

mod helpers;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;

use std::sync::Arc;

use bookshelf_cache::CacheManager;
use bookshelf_database::UserStore;

use helpers::{PASSWORD, SwitchableCache, TestApp, error_message};

#[tokio::test]
async fn register_then_login_then_profile() {
    let app = TestApp::new().await;

    let registered = app.register("alice@example.com", "editor").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["success"], true);
    assert_eq!(registered.body["data"]["email"], "alice@example.com");
    assert_eq!(registered.body["data"]["dob"], "1990-04-02");
    assert!(registered.body["data"]["userid"].is_string());
    assert!(registered.body["data"].get("password_hash").is_none());

    let token = app.login("alice@example.com").await;
    let profile = app.send(Method::GET, "/profile", Some(&token), None).await;

    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["email"], "alice@example.com");
    assert_eq!(profile.body["data"]["role"], "editor");
    assert_eq!(profile.body["data"]["active"], true);
    assert_eq!(profile.body["data"]["userid"], registered.body["data"]["userid"]);
}

#[tokio::test]
async fn registration_rejects_bad_input() {
    let app = TestApp::new().await;
    assert_eq!(
        app.register("dup@example.com", "viewer").await.status,
        StatusCode::CREATED
    );

    let duplicate = app.register("dup@example.com", "viewer").await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let bad_date = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "name": "Bob",
                "email": "bob@example.com",
                "password": PASSWORD,
                "role": "viewer",
                "dob": "04/02/1990",
            })),
        )
        .await;
    assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);

    let empty_password = app
        .send(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "name": "Bob",
                "email": "bob@example.com",
                "password": "",
                "role": "viewer",
            })),
        )
        .await;
    assert_eq!(empty_password.status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&empty_password).is_empty());
}

#[tokio::test]
async fn form_encoded_registration_and_login() {
    let app = TestApp::new().await;

    let form = |uri: &str, body: &str| {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let registered = app
        .dispatch(form(
            "/register",
            "name=Carol&email=carol%40example.com&password=pw&role=viewer&sex=f&phone=&details=&dob=",
        ))
        .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);
    assert_eq!(registered.body["data"]["gender"], "f");
    assert!(registered.body["data"]["dob"].is_null());

    let login = app
        .dispatch(form("/login", "email=carol%40example.com&password=pw"))
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body["data"]["token"].is_string());
}

#[tokio::test]
async fn bad_credentials_share_one_message() {
    let app = TestApp::new().await;
    app.register("alice@example.com", "editor").await;

    let wrong_password = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "nope" })),
        )
        .await;
    let unknown_email = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "mallory@example.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&wrong_password), error_message(&unknown_email));
}

#[tokio::test]
async fn gate_rejects_missing_and_invalid_tokens() {
    let app = TestApp::new().await;

    let missing = app.send(Method::GET, "/profile", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&missing), "missing authorization token");

    let garbage = app
        .send(Method::GET, "/profile", Some("not.a.token"), None)
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&garbage), "invalid or expired token");

    let basic = app
        .dispatch(
            Request::builder()
                .uri("/profile")
                .header(header::AUTHORIZATION, "Basic YWxpY2U6cHc=")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(basic.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_login_invalidates_first_token() {
    let app = TestApp::new().await;
    let first = app.user("alice@example.com", "editor").await;

    assert_eq!(
        app.send(Method::GET, "/profile", Some(&first), None).await.status,
        StatusCode::OK
    );

    let second = app.login("alice@example.com").await;
    assert_ne!(first, second);

    let stale = app.send(Method::GET, "/profile", Some(&first), None).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&stale), "invalid or expired token");

    assert_eq!(
        app.send(Method::GET, "/profile", Some(&second), None).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = TestApp::new().await;
    let token = app.user("alice@example.com", "editor").await;

    let logout = app.send(Method::POST, "/logout", Some(&token), None).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = app.send(Method::POST, "/logout", Some(&token), None).await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);

    let user = app.state.database.users.find_by_email("alice@example.com").await.unwrap().unwrap();
    assert!(!user.active);
}

#[tokio::test]
async fn cookie_transport_round_trip() {
    let app = TestApp::new().await;
    app.register("alice@example.com", "editor").await;

    let login = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({
                "email": "alice@example.com",
                "password": PASSWORD,
                "transport": "cookie",
            })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.body["data"].get("token").is_none());
    assert!(login.body["data"]["expires_at"].is_string());

    let set_cookie = login
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("Authorization=Bearer"));
    assert!(set_cookie.contains("HttpOnly"));

    let cookie_pair = set_cookie.split(';').next().unwrap().to_string();
    let profile = app
        .dispatch(
            Request::builder()
                .uri("/profile")
                .header(header::COOKIE, cookie_pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["data"]["email"], "alice@example.com");
}

#[tokio::test]
async fn profiles_lists_registered_emails() {
    let app = TestApp::new().await;
    let token = app.user("bob@example.com", "viewer").await;
    app.register("alice@example.com", "editor").await;

    let profiles = app.send(Method::GET, "/profiles", Some(&token), None).await;
    assert_eq!(profiles.status, StatusCode::OK);
    assert_eq!(
        profiles.body["data"]["emails"],
        json!(["alice@example.com", "bob@example.com"])
    );
}

#[tokio::test]
async fn profile_update_is_limited_to_the_owner() {
    let app = TestApp::new().await;
    let alice = app.user("alice@example.com", "editor").await;
    app.register("bob@example.com", "viewer").await;

    let updated = app
        .send(
            Method::PUT,
            "/profile/alice@example.com",
            Some(&alice),
            Some(json!({ "name": "Alice Liddell", "phone": "", "password": "new-password" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["name"], "Alice Liddell");
    assert_eq!(updated.body["data"]["role"], "editor");
    assert_eq!(updated.body["data"]["dob"], "1990-04-02");

    let relogin = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "new-password" })),
        )
        .await;
    assert_eq!(relogin.status, StatusCode::OK);
    let alice = relogin.body["data"]["token"].as_str().unwrap().to_string();

    let other = app
        .send(
            Method::PUT,
            "/profile/bob@example.com",
            Some(&alice),
            Some(json!({ "name": "Robert" })),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_profile_ends_its_session() {
    let app = TestApp::new().await;
    let token = app.user("alice@example.com", "editor").await;

    let deleted = app
        .send(Method::DELETE, "/profile/alice@example.com", Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let after = app.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let login = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_a_missing_profile_keeps_the_session() {
    let app = TestApp::new().await;
    let token = app.user("alice@example.com", "editor").await;
    UserStore::delete(app.store.as_ref(), "alice@example.com")
        .await
        .unwrap();

    let deleted = app
        .send(Method::DELETE, "/profile/alice@example.com", Some(&token), None)
        .await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&deleted), "user not found");

    assert!(app.state.token_validator.validate(&token).await.is_ok());
}

#[tokio::test]
async fn health_reports_ok_with_memory_backends() {
    let app = TestApp::new().await;
    let health = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");
    assert_eq!(health.body["data"]["cache"], true);
    assert_eq!(health.body["data"]["database"], true);
}

#[tokio::test]
async fn session_store_outage_fails_closed() {
    let cache = Arc::new(SwitchableCache::default());
    let app = TestApp::with_cache(CacheManager::from_provider(cache.clone()));
    let token = app.user("alice@example.com", "editor").await;

    cache.set_down(true);

    let profile = app.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(profile.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&profile), "internal server error");

    let health = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health.body["data"]["status"], "degraded");

    cache.set_down(false);
    let profile = app.send(Method::GET, "/profile", Some(&token), None).await;
    assert_eq!(profile.status, StatusCode::OK);
}
