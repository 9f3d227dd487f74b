//! Auth handlers: register, login, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::info;
use uuid::Uuid;

use bookshelf_entity::{NewUser, User};

use crate::dto::request::{LoginRequest, RegisterRequest, TokenTransport};
use crate::dto::response::{ApiResponse, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Payload};
use crate::state::AppState;

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let dob = req.parsed_dob()?;
    let password_hash = state.password_hasher.hash(&req.password)?;

    let user = state
        .database
        .users
        .create(NewUser {
            id: Uuid::new_v4(),
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            role: req.role.trim().to_string(),
            details: req.details,
            gender: req.gender,
            phone: req.phone,
            dob,
        })
        .await?;

    info!(subject_id = %user.id, role = %user.role, "User registered");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Payload(req): Payload<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    let result = state
        .session_manager
        .login(req.email.trim(), &req.password)
        .await?;
    let expires_at = result.issued.expires_at();

    match req.transport {
        TokenTransport::Body => Ok((
            jar,
            Json(ApiResponse::ok(LoginResponse {
                token: Some(result.issued.token),
                expires_at,
            })),
        )),
        TokenTransport::Cookie => {
            let cookie = Cookie::build((
                state.config.auth.cookie_name.clone(),
                format!("Bearer {}", result.issued.token),
            ))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);

            Ok((
                jar.add(cookie),
                Json(ApiResponse::ok(LoginResponse {
                    token: None,
                    expires_at,
                })),
            ))
        }
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    state.session_manager.logout(&auth).await?;

    let jar = jar.remove(Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/"));
    Ok((
        jar,
        Json(ApiResponse::ok(MessageResponse::new("Logged out successfully"))),
    ))
}
