//! Route definitions for the Bookshelf HTTP API.
//!
//! Registration, login and health are public. Every other route is
//! wrapped in the request gate; book routes additionally name the
//! privilege the caller's role must hold.

use axum::{
    Router, middleware as axum_middleware,
    routing::{MethodRouter, delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use bookshelf_auth::Privilege;

use crate::handlers;
use crate::middleware;
use crate::middleware::gate::RequestGate;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(public_routes())
        .merge(session_routes(&state))
        .merge(book_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Wrap a route in the request gate.
fn gated(
    route: MethodRouter<AppState>,
    state: &AppState,
    privilege: Option<Privilege>,
) -> MethodRouter<AppState> {
    route.route_layer(axum_middleware::from_fn_with_state(
        RequestGate::new(state.clone(), privilege),
        middleware::gate::request_gate,
    ))
}

/// Unauthenticated endpoints
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::health))
}

/// Endpoints that need a live session but no privilege
fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", gated(post(handlers::auth::logout), state, None))
        .route("/profile", gated(get(handlers::user::profile), state, None))
        .route("/profiles", gated(get(handlers::user::profiles), state, None))
        .route(
            "/profile/{email}",
            gated(put(handlers::user::update_profile), state, None),
        )
        .route(
            "/profile/{email}",
            gated(delete(handlers::user::delete_profile), state, None),
        )
}

/// Book CRUD, one privilege per operation
fn book_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/books",
            gated(get(handlers::book::list_books), state, Some(Privilege::BookRead)),
        )
        .route(
            "/books",
            gated(post(handlers::book::create_book), state, Some(Privilege::BookCreate)),
        )
        .route(
            "/books/{id}",
            gated(get(handlers::book::get_book), state, Some(Privilege::BookRead)),
        )
        .route(
            "/books/{id}",
            gated(put(handlers::book::update_book), state, Some(Privilege::BookUpdate)),
        )
        .route(
            "/books/{id}",
            gated(delete(handlers::book::delete_book), state, Some(Privilege::BookDelete)),
        )
}
