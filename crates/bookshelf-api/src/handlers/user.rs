//! User profile handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use bookshelf_core::error::AppError;
use bookshelf_entity::{User, UserUpdate};

use crate::dto::request::{UpdateProfileRequest, non_empty};
use crate::dto::response::{ApiResponse, MessageResponse, ProfilesResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Payload};
use crate::state::AppState;

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .database
        .users
        .find_by_email(&auth.email)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    Ok(Json(ApiResponse::ok(user)))
}

/// GET /profiles
pub async fn profiles(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<ProfilesResponse>>, ApiError> {
    let emails = state.database.users.list_emails().await?;
    Ok(Json(ApiResponse::ok(ProfilesResponse { emails })))
}

/// PUT /profile/{email}
pub async fn update_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    auth: AuthUser,
    Payload(req): Payload<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    ensure_self(&auth, &email)?;

    let password_hash = match non_empty(req.password) {
        Some(password) => Some(state.password_hasher.hash(&password)?),
        None => None,
    };

    let user = state
        .database
        .users
        .update(
            &email,
            UserUpdate {
                name: non_empty(req.name),
                details: non_empty(req.details),
                gender: non_empty(req.gender),
                phone: non_empty(req.phone),
                password_hash,
            },
        )
        .await?;

    info!(subject_id = %user.id, "Profile updated");
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /profile/{email}
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    ensure_self(&auth, &email)?;

    let removed = state
        .database
        .users
        .delete(&email)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    state.session_manager.revoke(removed.id).await?;

    info!(subject_id = %removed.id, "Profile deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new("Profile deleted"))))
}

/// Profiles may only be changed by their owner.
fn ensure_self(auth: &AuthUser, email: &str) -> Result<(), AppError> {
    if auth.email.eq_ignore_ascii_case(email.trim()) {
        Ok(())
    } else {
        Err(AppError::forbidden("cannot modify another user's profile"))
    }
}
