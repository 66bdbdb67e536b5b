//! Teacher domain models and DTOs.

use crate::users::User;
use crate::value_types::Gender;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A teacher and their role-specific attributes.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone_number: String,
    pub address: String,
    pub subject_specialization: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher together with its owning user account.
#[derive(Serialize, Debug, ToSchema)]
pub struct TeacherWithUser {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub user: User,
}

/// DTO for creating a teacher and its user account.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    pub gender: Gender,
    #[validate(length(min = 1, max = 15, message = "must be between 1 and 15 characters"))]
    pub phone_number: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub subject_specialization: String,
}

/// DTO for partially updating a teacher.
///
/// Absent fields are left untouched; present fields obey the creation
/// rules. A present `email` also updates the owning user account.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateTeacherDto {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 15, message = "must be between 1 and 15 characters"))]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub subject_specialization: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_dto_validation() {
        let valid_dto = CreateTeacherDto {
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: "alan.turing@example.com".to_string(),
            password: "secret1".to_string(),
            gender: Gender::Male,
            phone_number: "0712345678".to_string(),
            address: "12 Bletchley Park".to_string(),
            subject_specialization: "Mathematics".to_string(),
        };
        assert!(valid_dto.validate().is_ok());
    }

    #[test]
    fn test_update_teacher_dto_empty_is_valid() {
        let empty_dto = UpdateTeacherDto {
            first_name: None,
            last_name: None,
            email: None,
            gender: None,
            phone_number: None,
            address: None,
            subject_specialization: None,
        };
        assert!(empty_dto.validate().is_ok());
    }

    #[test]
    fn test_update_teacher_dto_present_fields_are_checked() {
        let invalid_dto = UpdateTeacherDto {
            first_name: None,
            last_name: None,
            email: Some("not-an-email".to_string()),
            gender: None,
            phone_number: Some("0712345678901234".to_string()),
            address: None,
            subject_specialization: None,
        };
        let errors = invalid_dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("phone_number"));
    }
}
