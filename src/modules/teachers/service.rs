use crate::{
    modules::teachers::model::{CreateTeacherDto, Teacher, TeacherWithUser, UpdateTeacherDto},
    modules::users::model::{User, display_name},
    modules::users::service::UserService,
    utils::errors::AppError,
    validator::FieldErrors,
};
use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct TeacherService;

impl TeacherService {
    /// Create a teacher and its user account in one transaction.
    #[instrument(skip(db, dto))]
    pub async fn create_teacher(
        db: &PgPool,
        dto: CreateTeacherDto,
    ) -> Result<TeacherWithUser, AppError> {
        let mut errors = FieldErrors::new();
        if UserService::email_taken(db, &dto.email, None).await? {
            errors.push("email", "has already been taken");
        }
        if Self::phone_taken(db, &dto.phone_number, None).await? {
            errors.push("phone_number", "has already been taken");
        }
        errors.into_result()?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let name = display_name(&dto.first_name, &dto.last_name);
        let user = UserService::insert_user(&mut *tx, &name, &dto.email, &dto.password).await?;

        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            INSERT INTO teachers (user_id, first_name, last_name, gender, phone_number,
                                  address, subject_specialization)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, first_name, last_name, gender, phone_number,
                      address, subject_specialization, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.gender)
        .bind(&dto.phone_number)
        .bind(&dto.address)
        .bind(&dto.subject_specialization)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Teacher with phone number {} already exists",
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

        Ok(TeacherWithUser { teacher, user })
    }

    /// Fetch a teacher together with its user account.
    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: Uuid) -> Result<TeacherWithUser, AppError> {
        let teacher = Self::find_teacher(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;
        let user = UserService::get_user(db, teacher.user_id).await?;

        Ok(TeacherWithUser { teacher, user })
    }

    /// Partially update a teacher.
    ///
    /// Absent fields keep their stored values. When the email changes, the
    /// owning user account is updated in the same transaction and its
    /// display name recomputed from the merged first and last names.
    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherWithUser, AppError> {
        let existing = Self::find_teacher(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

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
        let subject_specialization = dto
            .subject_specialization
            .unwrap_or(existing.subject_specialization);

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            UPDATE teachers
            SET first_name = $1, last_name = $2, gender = $3, phone_number = $4,
                address = $5, subject_specialization = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, user_id, first_name, last_name, gender, phone_number,
                      address, subject_specialization, created_at, updated_at
            "#,
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(gender)
        .bind(&phone_number)
        .bind(&address)
        .bind(&subject_specialization)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Teacher with phone number {} already exists",
                        phone_number
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        let user = if let Some(email) = dto.email {
            let name = display_name(&teacher.first_name, &teacher.last_name);
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

        Ok(TeacherWithUser { teacher, user })
    }

    /// Delete a teacher and its user account in one transaction.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let teacher = Self::find_teacher(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete teacher")
            .map_err(AppError::database)?;

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(teacher.user_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete teacher's user")
            .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit transaction")
            .map_err(AppError::database)?;

        Ok(())
    }

    async fn find_teacher(
        executor: impl sqlx::PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Teacher>, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, user_id, first_name, last_name, gender, phone_number,
                   address, subject_specialization, created_at, updated_at
            FROM teachers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch teacher by ID")
        .map_err(AppError::database)?;

        Ok(teacher)
    }

    async fn phone_taken(
        executor: impl sqlx::PgExecutor<'_>,
        phone_number: &str,
        exclude_teacher_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM teachers
                WHERE phone_number = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(phone_number)
        .bind(exclude_teacher_id)
        .fetch_one(executor)
        .await
        .context("Failed to check teacher phone uniqueness")
        .map_err(AppError::database)?;

        Ok(taken)
    }
}
