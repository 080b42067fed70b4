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
use crate::models::material::*;
use crate::models::shared::{AdminCredentials, MessageResponse};
use crate::repository::{CatalogError, MaterialRepository};
use crate::repository::material::MaterialInput;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Materials",
    operation_id = "listMaterials",
    summary = "List materials",
    description = "Returns every material ordered by name.",
    responses(
        (status = 200, description = "List of materials", body = [MaterialResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialResponse>>, AppError> {
    let materials = MaterialRepository::new(&state.db).list().await?;
    Ok(Json(materials.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Materials",
    operation_id = "getMaterial",
    summary = "Get a material by ID",
    description = "Returns the material with `swordCount`, the number of swords made of it.",
    params(("id" = i32, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material details", body = MaterialDetailResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Material not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MaterialDetailResponse>, AppError> {
    let repo = MaterialRepository::new(&state.db);
    let material = repo
        .find_by_id(id)
        .await?
        .ok_or(CatalogError::NotFound("Material"))?;
    let sword_count = repo.count_swords(id).await?;

    Ok(Json(MaterialDetailResponse {
        material: material.into(),
        sword_count,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Materials",
    operation_id = "createMaterial",
    summary = "Create a material",
    description = "Requires `adminPassword`.",
    request_body = MaterialRequest,
    responses(
        (status = 201, description = "Material created", body = MaterialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_material(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = payload.admin_password.clone();
    let input = MaterialInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = MaterialRepository::new(&state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(MaterialResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Materials",
    operation_id = "updateMaterial",
    summary = "Replace a material",
    description = "Overwrites name and description. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Material ID")),
    request_body = MaterialRequest,
    responses(
        (status = 200, description = "Material updated", body = MaterialResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Material not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<MaterialRequest>,
) -> Result<Json<MaterialResponse>, AppError> {
    let password = payload.admin_password.clone();
    let input = MaterialInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = MaterialRepository::new(&state.db).update(id, input).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Materials",
    operation_id = "deleteMaterial",
    summary = "Delete a material",
    description = "Refused with CONFLICT while any sword is made of the material. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Material ID")),
    request_body = AdminCredentials,
    responses(
        (status = 200, description = "Material deleted", body = MessageResponse),
        (status = 400, description = "Invalid id or material still in use (VALIDATION_ERROR, CONFLICT)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Material not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, credentials), fields(id))]
pub async fn delete_material(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AdminBody(credentials): AdminBody,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state.db, credentials.admin_password.as_deref()).await?;

    MaterialRepository::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::deleted("Material")))
}
