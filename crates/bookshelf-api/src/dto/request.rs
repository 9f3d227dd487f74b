//! Request DTOs with validation.
//!
//! Bodies arrive either as JSON or as urlencoded forms; see
//! [`Payload`](crate::extractors::Payload).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use bookshelf_core::error::AppError;

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[serde(default, alias = "sex")]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub details: String,
    /// Date of birth as `YYYY-MM-DD`.
    #[serde(default)]
    pub dob: Option<String>,
}

impl RegisterRequest {
    /// Parse the optional date of birth. Blank means absent.
    pub fn parsed_dob(&self) -> Result<Option<NaiveDate>, AppError> {
        match non_empty(self.dob.clone()) {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| AppError::validation("dob must be formatted as YYYY-MM-DD")),
            None => Ok(None),
        }
    }
}

/// Where the login response should put the token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenTransport {
    /// Return the token in the JSON body.
    #[default]
    Body,
    /// Set an HTTP-only cookie and omit the token from the body.
    Cookie,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub transport: TokenTransport,
}

/// Profile update body. Omitted or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[serde(alias = "sex")]
    pub gender: Option<String>,
    pub details: Option<String>,
    pub phone: Option<String>,
    /// New plaintext password, re-hashed before storage.
    pub password: Option<String>,
}

/// Book creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Book update body. Omitted or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Forms submit untouched inputs as empty strings.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
