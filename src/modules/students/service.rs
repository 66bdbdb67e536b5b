use crate::{
    modules::guardians::service::GuardianService,
    modules::students::model::{CreateStudentDto, Student, StudentWithUser, UpdateStudentDto},
    modules::users::model::{User, display_name},
    modules::users::service::UserService,
    utils::errors::AppError,
    validator::FieldErrors,
};
use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct StudentService;

impl StudentService {
    /// Provision a student: create its user account, resolve the guardian
    /// by email, and link all three rows inside one transaction.
    ///
    /// Guardian resolution is lookup-or-create keyed on the guardian
    /// email's user. When that user already owns a guardian, the stored
    /// guardian is linked as-is and the supplied guardian fields are
    /// ignored rather than merged. Unique constraints are the authority
    /// for concurrent requests racing on the same email or phone; the
    /// loser gets a conflict and may retry.
    #[instrument(skip(db, dto))]
    pub async fn provision_student(
        db: &PgPool,
        dto: CreateStudentDto,
    ) -> Result<StudentWithUser, AppError> {
        let guardian_user = UserService::find_user_by_email(db, &dto.guardian_email).await?;
        let existing_guardian = match &guardian_user {
            Some(user) => GuardianService::find_guardian_by_user(db, user.id).await?,
            None => None,
        };

        let mut errors = FieldErrors::new();
        if UserService::email_taken(db, &dto.email, None).await? {
            errors.push("email", "has already been taken");
        }
        if Self::phone_taken(db, &dto.phone_number, None).await? {
            errors.push("phone_number", "has already been taken");
        }
        // The guardian phone only matters when a fresh guardian row will
        // be created; the reuse branch leaves the stored fields untouched.
        if existing_guardian.is_none()
            && GuardianService::phone_taken(db, &dto.guardian_phone_number).await?
        {
            errors.push("guardian_phone_number", "has already been taken");
        }
        errors.into_result()?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student_name = display_name(&dto.first_name, &dto.last_name);
        let student_user =
            UserService::insert_user(&mut *tx, &student_name, &dto.email, &dto.password).await?;

        let guardian = match (guardian_user, existing_guardian) {
            (Some(_), Some(guardian)) => guardian,
            (Some(user), None) => {
                GuardianService::insert_guardian(
                    &mut *tx,
                    user.id,
                    &dto.guardian_first_name,
                    &dto.guardian_last_name,
                    dto.guardian_gender,
                    &dto.guardian_phone_number,
                )
                .await?
            }
            (None, _) => {
                let guardian_name =
                    display_name(&dto.guardian_first_name, &dto.guardian_last_name);
                let guardian_user = UserService::insert_user(
                    &mut *tx,
                    &guardian_name,
                    &dto.guardian_email,
                    &dto.guardian_password,
                )
                .await?;
                GuardianService::insert_guardian(
                    &mut *tx,
                    guardian_user.id,
                    &dto.guardian_first_name,
                    &dto.guardian_last_name,
                    dto.guardian_gender,
                    &dto.guardian_phone_number,
                )
                .await?
            }
        };

        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (user_id, guardian_id, first_name, last_name, gender,
                                  phone_number, address, date_of_birth)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, guardian_id, first_name, last_name, gender,
                      phone_number, address, date_of_birth, created_at, updated_at
            "#,
        )
        .bind(student_user.id)
        .bind(guardian.id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.gender)
        .bind(&dto.phone_number)
        .bind(&dto.address)
        .bind(dto.date_of_birth)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Student with phone number {} already exists",
                        dto.phone_number
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit()
            .await
            .context("Failed to commit transaction")
            .map_err(AppError::database)?;

        Ok(StudentWithUser {
            student,
            user: student_user,
        })
    }

    /// Fetch a student together with its user account.
    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<StudentWithUser, AppError> {
        let student = Self::find_student(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;
        let user = UserService::get_user(db, student.user_id).await?;

        Ok(StudentWithUser { student, user })
    }

    /// Partially update a student.
    ///
    /// Absent fields keep their stored values. When the email changes, the
    /// owning user account is updated in the same transaction and its
    /// display name recomputed from the merged first and last names.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<StudentWithUser, AppError> {
        let existing = Self::find_student(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let mut errors = FieldErrors::new();
        if let Some(email) = &dto.email {
            if UserService::email_taken(db, email, Some(existing.user_id)).await? {
                errors.push("email", "has already been taken");
            }
        }
        if let Some(phone_number) = &dto.phone_number {
            if Self::phone_taken(db, phone_number, Some(id)).await? {
                errors.push("phone_number", "has already been taken");
            }
        }
        errors.into_result()?;

        let user_id = existing.user_id;
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let gender = dto.gender.unwrap_or(existing.gender);
        let phone_number = dto.phone_number.unwrap_or(existing.phone_number);
        let address = dto.address.unwrap_or(existing.address);
        let date_of_birth = dto.date_of_birth.unwrap_or(existing.date_of_birth);

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET first_name = $1, last_name = $2, gender = $3, phone_number = $4,
                address = $5, date_of_birth = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, user_id, guardian_id, first_name, last_name, gender,
                      phone_number, address, date_of_birth, created_at, updated_at
            "#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(gender)
        .bind(&phone_number)
        .bind(&address)
        .bind(date_of_birth)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Student with phone number {} already exists",
                        phone_number
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        let user = if let Some(email) = dto.email {
            let name = display_name(&student.first_name, &student.last_name);
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET email = $1, name = $2, updated_at = NOW()
                WHERE id = $3
                RETURNING id, name, email, created_at, updated_at
                "#,
            )
            .bind(&email)
            .bind(&name)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::conflict(anyhow::anyhow!(
                            "User with email {} already exists",
                            email
                        ));
                    }
                }
                AppError::database(anyhow::Error::from(e))
            })?
        } else {
            UserService::get_user(&mut *tx, user_id).await?
        };

        tx.commit()
            .await
            .context("Failed to commit transaction")
            .map_err(AppError::database)?;

        Ok(StudentWithUser { student, user })
    }

    /// Delete a student and its user account in one transaction.
    ///
    /// The guardian (and its user) stays; other students may reference it.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let student = Self::find_student(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(student.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete student's user")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit transaction")
            .map_err(AppError::database)?;

        Ok(())
    }

    async fn find_student(
        executor: impl sqlx::PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, user_id, guardian_id, first_name, last_name, gender,
                   phone_number, address, date_of_birth, created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch student by ID")
        .map_err(AppError::database)?;

        Ok(student)
    }

    async fn phone_taken(
        executor: impl sqlx::PgExecutor<'_>,
        phone_number: &str,
        exclude_student_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM students
                WHERE phone_number = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(phone_number)
        .bind(exclude_student_id)
        .fetch_one(executor)
        .await
        .context("Failed to check student phone uniqueness")
        .map_err(AppError::database)?;

        Ok(taken)
    }
}
