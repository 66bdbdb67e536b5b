use crate::modules::guardians::model::{CreateGuardianDto, GuardianWithUser};
use crate::modules::guardians::service::GuardianService;
use crate::state::AppState;
use crate::utils::errors::{AppError, ErrorResponse};
use crate::validator::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::instrument;

/// Create a guardian together with its user account
#[utoipa::path(
    post,
    path = "/api/guardians",
    request_body = CreateGuardianDto,
    responses(
        (status = 201, description = "Guardian created successfully", body = GuardianWithUser),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 409, description = "Email or phone number already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Guardians"
)]
#[instrument(skip(state, dto))]
pub async fn create_guardian(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateGuardianDto>,
) -> Result<impl IntoResponse, AppError> {
    let guardian = GuardianService::create_guardian(&state.db, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Guardian created successfully",
            "data": guardian
        })),
    ))
}
