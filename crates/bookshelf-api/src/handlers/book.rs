//! Book CRUD handlers. Each route is gated on its book privilege.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

use bookshelf_core::error::AppError;
use bookshelf_entity::{Book, BookUpdate, NewBook};

use crate::dto::request::{CreateBookRequest, UpdateBookRequest, non_empty};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, Payload, parse_book_id};
use crate::state::AppState;

/// GET /books
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Book>>>, ApiError> {
    let books = state.database.books.list().await?;
    Ok(Json(ApiResponse::ok(books)))
}

/// GET /books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let id = parse_book_id(&id)?;
    let book = state
        .database
        .books
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))?;

    Ok(Json(ApiResponse::ok(book)))
}

/// POST /books
pub async fn create_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(req): Payload<CreateBookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Book>>), ApiError> {
    let book = state
        .database
        .books
        .create(NewBook {
            title: req.title.trim().to_string(),
            description: req.description,
            created_by: auth.email.clone(),
        })
        .await?;

    info!(book_id = book.id, created_by = %book.created_by, "Book created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(book))))
}

/// PUT /books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Payload(req): Payload<UpdateBookRequest>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let id = parse_book_id(&id)?;
    let book = state
        .database
        .books
        .update(
            id,
            BookUpdate {
                title: non_empty(req.title),
                description: non_empty(req.description),
                updated_by: auth.email.clone(),
            },
        )
        .await?;

    info!(book_id = book.id, updated_by = %book.updated_by, "Book updated");
    Ok(Json(ApiResponse::ok(book)))
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = parse_book_id(&id)?;
    if !state.database.books.delete(id).await? {
        return Err(AppError::not_found(format!("book {id} not found")).into());
    }

    info!(book_id = id, deleted_by = %auth.email, "Book deleted");
    Ok(Json(ApiResponse::ok(MessageResponse::new(format!(
        "book {id} deleted"
    )))))
}
