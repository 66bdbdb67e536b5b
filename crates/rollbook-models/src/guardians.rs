//! Guardian domain models and DTOs.

use crate::users::User;
use crate::value_types::Gender;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A guardian responsible for one or more students.
///
/// `user_id` points at the owning account row; the row is created in the
/// same transaction as the guardian and removed with it.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Guardian {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Guardian together with its owning user account.
#[derive(Serialize, Debug, ToSchema)]
pub struct GuardianWithUser {
    #[serde(flatten)]
    pub guardian: Guardian,
    pub user: User,
}

/// DTO for creating a guardian and its user account.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateGuardianDto {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    pub gender: Gender,
    #[validate(length(equal = 10, message = "must be exactly 10 characters"))]
    pub phone_number: String,
}
