//! Typed path parameter helpers.

use bookshelf_core::error::AppError;

/// Parses a book id from a path segment.
pub fn parse_book_id(s: &str) -> Result<i32, AppError> {
    s.parse()
        .map_err(|_| AppError::validation(format!("invalid book id: {s}")))
}
