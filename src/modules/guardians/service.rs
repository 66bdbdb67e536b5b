use crate::{
    modules::guardians::model::{CreateGuardianDto, Guardian, GuardianWithUser},
    modules::users::model::display_name,
    modules::users::service::UserService,
    utils::errors::AppError,
    validator::FieldErrors,
};
use anyhow::Context;
use rollbook_models::value_types::Gender;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct GuardianService;

impl GuardianService {
    /// Create a guardian and its user account in one transaction.
    #[instrument(skip(db, dto))]
    pub async fn create_guardian(
        db: &PgPool,
        dto: CreateGuardianDto,
    ) -> Result<GuardianWithUser, AppError> {
        let mut errors = FieldErrors::new();
        if UserService::email_taken(db, &dto.email, None).await? {
            errors.push("email", "has already been taken");
        }
        if Self::phone_taken(db, &dto.phone_number).await? {
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
        let guardian = Self::insert_guardian(
            &mut *tx,
            user.id,
            &dto.first_name,
            &dto.last_name,
            dto.gender,
            &dto.phone_number,
        )
        .await?;

        tx.commit()
            .await
            .context("Failed to commit transaction")
            .map_err(AppError::database)?;

        Ok(GuardianWithUser { guardian, user })
    }

    /// Insert a guardian row owned by `user_id`.
    pub async fn insert_guardian(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
        gender: Gender,
        phone_number: &str,
    ) -> Result<Guardian, AppError> {
        let guardian = sqlx::query_as::<_, Guardian>(
            r#"
            INSERT INTO guardians (user_id, first_name, last_name, gender, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, first_name, last_name, gender, phone_number,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .bind(gender)
        .bind(phone_number)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("guardians_user_id_key") => AppError::conflict(anyhow::anyhow!(
                            "User already owns a guardian record"
                        )),
                        _ => AppError::conflict(anyhow::anyhow!(
                            "Guardian with phone number {} already exists",
                            phone_number
                        )),
                    };
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(guardian)
    }

    /// Look up the guardian owned by a user, if any.
    pub async fn find_guardian_by_user(
        executor: impl sqlx::PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Option<Guardian>, AppError> {
        let guardian = sqlx::query_as::<_, Guardian>(
            r#"
            SELECT id, user_id, first_name, last_name, gender, phone_number,
                   created_at, updated_at
            FROM guardians
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch guardian by user")
        .map_err(AppError::database)?;

        Ok(guardian)
    }

    pub async fn phone_taken(
        executor: impl sqlx::PgExecutor<'_>,
        phone_number: &str,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM guardians WHERE phone_number = $1)
            "#,
        )
        .bind(phone_number)
        .fetch_one(executor)
        .await
        .context("Failed to check guardian phone uniqueness")
        .map_err(AppError::database)?;

        Ok(taken)
    }
}
