use crate::{
    modules::users::model::{CreateUserDto, User, display_name},
    utils::{errors::AppError, password::hash_password},
    validator::FieldErrors,
};
use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    /// Create a standalone user account.
    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let mut errors = FieldErrors::new();
        if Self::email_taken(db, &dto.email, None).await? {
            errors.push("email", "has already been taken");
        }
        errors.into_result()?;

        let name = display_name(&dto.first_name, &dto.last_name);
        Self::insert_user(db, &name, &dto.email, &dto.password).await
    }

    /// Insert a user row, hashing the supplied credential.
    ///
    /// Generic over the executor so role services can run it inside their
    /// own transaction.
    pub async fn insert_user(
        executor: impl sqlx::PgExecutor<'_>,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let hashed_password = hash_password(password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&hashed_password)
        .fetch_one(executor)
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
        })?;

        Ok(user)
    }

    pub async fn get_user(
        executor: impl sqlx::PgExecutor<'_>,
        id: Uuid,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch user by ID")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    pub async fn find_user_by_email(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        Ok(user)
    }

    /// Whether an email is already in use, optionally ignoring one user id
    /// (the self-exclusion case on partial updates).
    pub async fn email_taken(
        executor: impl sqlx::PgExecutor<'_>,
        email: &str,
        exclude_user_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_user_id)
        .fetch_one(executor)
        .await
        .context("Failed to check email uniqueness")
        .map_err(AppError::database)?;

        Ok(taken)
    }
}
