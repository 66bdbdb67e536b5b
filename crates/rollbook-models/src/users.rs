//! User account models and DTOs.
//!
//! A user row carries the account identity (display name, email, credential
//! hash) for either a standalone account or a role record's owner. The
//! credential hash is write-only: it is never selected into [`User`] and so
//! never reaches a response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A user account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a standalone user account.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// Join first and last name into the stored display name.
///
/// Surrounding whitespace is dropped and exactly one space separates the
/// parts.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}
