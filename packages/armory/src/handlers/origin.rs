use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use super::require_admin;
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminBody;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::origin::*;
use crate::models::shared::{AdminCredentials, MessageResponse};
use crate::repository::{CatalogError, OriginRepository};
use crate::repository::origin::OriginInput;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Origins",
    operation_id = "listOrigins",
    summary = "List origins",
    description = "Returns every origin ordered by name.",
    responses(
        (status = 200, description = "List of origins", body = [OriginResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_origins(
    State(state): State<AppState>,
) -> Result<Json<Vec<OriginResponse>>, AppError> {
    let origins = OriginRepository::new(&state.db).list().await?;
    Ok(Json(origins.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Origins",
    operation_id = "getOrigin",
    summary = "Get a origin by ID",
    description = "Returns the origin with `swordCount`, the number of swords attributed to it.",
    params(("id" = i32, Path, description = "Origin ID")),
    responses(
        (status = 200, description = "Origin details", body = OriginDetailResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Origin not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_origin(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<OriginDetailResponse>, AppError> {
    let repo = OriginRepository::new(&state.db);
    let origin = repo
        .find_by_id(id)
        .await?
        .ok_or(CatalogError::NotFound("Origin"))?;
    let sword_count = repo.count_swords(id).await?;

    Ok(Json(OriginDetailResponse {
        origin: origin.into(),
        sword_count,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Origins",
    operation_id = "createOrigin",
    summary = "Create a origin",
    description = "Requires `adminPassword`.",
    request_body = OriginRequest,
    responses(
        (status = 201, description = "Origin created", body = OriginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_origin(
    State(state): State<AppState>,
    AppJson(payload): AppJson<OriginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = payload.admin_password.clone();
    let input = OriginInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = OriginRepository::new(&state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(OriginResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Origins",
    operation_id = "updateOrigin",
    summary = "Replace a origin",
    description = "Overwrites name, region, historical period and description. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Origin ID")),
    request_body = OriginRequest,
    responses(
        (status = 200, description = "Origin updated", body = OriginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Origin not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_origin(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<OriginRequest>,
) -> Result<Json<OriginResponse>, AppError> {
    let password = payload.admin_password.clone();
    let input = OriginInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = OriginRepository::new(&state.db).update(id, input).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Origins",
    operation_id = "deleteOrigin",
    summary = "Delete a origin",
    description = "Swords attributed to the origin keep existing with `origin_id` cleared. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Origin ID")),
    request_body = AdminCredentials,
    responses(
        (status = 200, description = "Origin deleted", body = MessageResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Origin not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, credentials), fields(id))]
pub async fn delete_origin(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AdminBody(credentials): AdminBody,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state.db, credentials.admin_password.as_deref()).await?;

    OriginRepository::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::deleted("Origin")))
}
