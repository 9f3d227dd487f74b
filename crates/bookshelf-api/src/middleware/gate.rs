//! Request gate: token extraction, session validation and privilege checks.
//!
//! A request moves through `NoToken → TokenPresent → SignatureValid →
//! SessionLive → PermissionGranted → Dispatched`. Any failed step ends the
//! request with a rejection and the handler is never invoked.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use tracing::debug;

use bookshelf_auth::{AuthError, AuthorizedRequest, Privilege};

use crate::error::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Per-route gate configuration: the shared state plus the privilege the
/// route requires, if any.
#[derive(Debug, Clone)]
pub struct RequestGate {
    state: AppState,
    privilege: Option<Privilege>,
}

impl RequestGate {
    pub fn new(state: AppState, privilege: Option<Privilege>) -> Self {
        Self { state, privilege }
    }
}

/// Reject the request unless it carries a live session token and, when the
/// route requires one, the caller's current role holds the privilege.
///
/// On success the verified identity is inserted into the request
/// extensions, where [`AuthUser`](crate::extractors::AuthUser) reads it.
pub async fn request_gate(
    State(gate): State<RequestGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers(), &gate.state.config.auth.cookie_name)?;

    let claims = gate
        .state
        .token_validator
        .validate(&token)
        .await
        .inspect_err(|e| debug!(reason = %e, "Session token rejected"))?;
    let caller = AuthorizedRequest::from(claims);

    if let Some(privilege) = gate.privilege {
        gate.state
            .access_controller
            .require(&caller.email, privilege)
            .await
            .inspect_err(|e| {
                debug!(
                    subject_id = %caller.subject_id,
                    privilege = %privilege,
                    reason = %e,
                    "Access refused"
                )
            })?;
    }

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

/// Pull the bearer token from the `Authorization` header, falling back to
/// the named cookie when the header is absent.
///
/// A header that is present but not a bearer credential is rejected rather
/// than skipped.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Result<String, AuthError> {
    if let Some(value) = headers.get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MalformedToken)?;
        return bearer(value).ok_or(AuthError::MalformedToken);
    }

    let jar = CookieJar::from_headers(headers);
    match jar.get(cookie_name) {
        Some(cookie) => {
            let value = cookie.value();
            bearer(value)
                .or_else(|| non_blank(value))
                .ok_or(AuthError::MalformedToken)
        }
        None => Err(AuthError::MissingToken),
    }
}

fn bearer(value: &str) -> Option<String> {
    value.strip_prefix(BEARER_PREFIX).and_then(non_blank)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
