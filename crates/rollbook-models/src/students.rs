//! Student domain models and DTOs.
//!
//! Creating a student also provisions its guardian, so
//! [`CreateStudentDto`] carries two field sets: the student's own and the
//! guardian's. The guardian set is only consulted when the guardian email
//! does not already own a guardian row.

use crate::users::User;
use crate::value_types::Gender;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A student enrolled in the school.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub guardian_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub phone_number: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student together with its owning user account.
#[derive(Serialize, Debug, ToSchema)]
pub struct StudentWithUser {
    #[serde(flatten)]
    pub student: Student,
    pub user: User,
}

/// DTO for creating a student plus the guardian it links to.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateStudentDto {
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
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub address: String,
    #[validate(custom(function = "validate_past_date", message = "must be a date in the past"))]
    pub date_of_birth: NaiveDate,

    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub guardian_first_name: String,
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters"))]
    pub guardian_last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub guardian_email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub guardian_password: String,
    pub guardian_gender: Gender,
    #[validate(length(equal = 10, message = "must be exactly 10 characters"))]
    pub guardian_phone_number: String,
}

/// DTO for partially updating a student.
///
/// Absent fields are left untouched; present fields obey the creation
/// rules. A present `email` also updates the owning user account.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateStudentDto {
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
    #[validate(custom(function = "validate_past_date", message = "must be a date in the past"))]
    pub date_of_birth: Option<NaiveDate>,
}

/// Check that a date lies strictly before today.
pub fn validate_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        return Err(ValidationError::new("past_date"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn valid_dto() -> CreateStudentDto {
        CreateStudentDto {
            first_name: "Linus".to_string(),
            last_name: "Torvalds".to_string(),
            email: "linus.torvalds@example.com".to_string(),
            password: "secret1".to_string(),
            gender: Gender::Male,
            phone_number: "0712345678".to_string(),
            address: "1 Kernel Street".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2010, 6, 7).unwrap(),
            guardian_first_name: "Anna".to_string(),
            guardian_last_name: "Torvalds".to_string(),
            guardian_email: "anna.torvalds@example.com".to_string(),
            guardian_password: "secret2".to_string(),
            guardian_gender: Gender::Female,
            guardian_phone_number: "0787654321".to_string(),
        }
    }

    #[test]
    fn test_create_student_dto_validation() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_validate_past_date_rejects_today() {
        let today = Utc::now().date_naive();
        assert!(validate_past_date(&today).is_err());
    }

    #[test]
    fn test_validate_past_date_rejects_future() {
        let tomorrow = Utc::now().date_naive().checked_add_days(Days::new(1)).unwrap();
        assert!(validate_past_date(&tomorrow).is_err());
    }

    #[test]
    fn test_validate_past_date_accepts_yesterday() {
        let yesterday = Utc::now().date_naive().checked_sub_days(Days::new(1)).unwrap();
        assert!(validate_past_date(&yesterday).is_ok());
    }

    #[test]
    fn test_create_student_dto_future_birth_date() {
        let mut dto = valid_dto();
        dto.date_of_birth = Utc::now().date_naive().checked_add_days(Days::new(30)).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("date_of_birth"));
    }

    #[test]
    fn test_create_student_dto_collects_violations_across_both_field_sets() {
        let mut dto = valid_dto();
        dto.password = "short".to_string();
        dto.guardian_phone_number = "123".to_string();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("guardian_phone_number"));
    }

    #[test]
    fn test_update_student_dto_skips_absent_fields() {
        let dto = UpdateStudentDto {
            first_name: None,
            last_name: None,
            email: None,
            gender: None,
            phone_number: None,
            address: Some("2 Userland Avenue".to_string()),
            date_of_birth: None,
        };
        assert!(dto.validate().is_ok());
    }
}
