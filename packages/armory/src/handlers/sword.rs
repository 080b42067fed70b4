use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use super::require_admin;
use crate::error::{AppError, ErrorBody};
use crate::extractors::admin::AdminBody;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::shared::{AdminCredentials, MessageResponse};
use crate::models::sword::*;
use crate::repository::SwordRepository;
use crate::repository::sword::{NewSword, SwordPatch};
use crate::state::AppState;

fn to_responses(models: Vec<crate::entity::sword::Model>) -> Vec<SwordResponse> {
    models.into_iter().map(Into::into).collect()
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Swords",
    operation_id = "listSwords",
    summary = "List swords",
    description = "Returns every sword ordered by name. With `details=true` each entry also carries `category_name`, `origin_name` and its materials.",
    params(SwordListQuery),
    responses(
        (status = 200, description = "List of swords", body = SwordListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_swords(
    State(state): State<AppState>,
    Query(query): Query<SwordListQuery>,
) -> Result<Json<SwordListResponse>, AppError> {
    let repo = SwordRepository::new(&state.db);

    let body = if query.detailed() {
        let details = repo.list_detailed().await?;
        SwordListResponse::Detailed(details.into_iter().map(Into::into).collect())
    } else {
        SwordListResponse::Basic(to_responses(repo.list().await?))
    };

    Ok(Json(body))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Swords",
    operation_id = "getSword",
    summary = "Get a sword by ID",
    description = "Returns the sword aggregate: the sword row, its category and origin names and its materials ordered by name.",
    params(("id" = i32, Path, description = "Sword ID")),
    responses(
        (status = 200, description = "Sword details", body = SwordDetailResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Sword not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_sword(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<SwordDetailResponse>, AppError> {
    let details = SwordRepository::new(&state.db).get_details(id).await?;
    Ok(Json(details.into()))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Swords",
    operation_id = "searchSwords",
    summary = "Search swords by name",
    description = "Case-insensitive substring match on the sword name.",
    params(SwordSearchQuery),
    responses(
        (status = 200, description = "Matching swords", body = [SwordResponse]),
        (status = 400, description = "Missing search term (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_swords(
    State(state): State<AppState>,
    Query(query): Query<SwordSearchQuery>,
) -> Result<Json<Vec<SwordResponse>>, AppError> {
    let term = validate_search_term(query.term.as_deref())?;
    let swords = SwordRepository::new(&state.db).search(term).await?;
    Ok(Json(to_responses(swords)))
}

#[utoipa::path(
    get,
    path = "/category/{category_id}",
    tag = "Swords",
    operation_id = "listSwordsByCategory",
    summary = "List swords in a category",
    params(("category_id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Swords in the category", body = [SwordResponse]),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(category_id))]
pub async fn list_swords_by_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i32>,
) -> Result<Json<Vec<SwordResponse>>, AppError> {
    let swords = SwordRepository::new(&state.db)
        .find_by_category(category_id)
        .await?;
    Ok(Json(to_responses(swords)))
}

#[utoipa::path(
    get,
    path = "/material/{material_id}",
    tag = "Swords",
    operation_id = "listSwordsByMaterial",
    summary = "List swords made of a material",
    params(("material_id" = i32, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Swords using the material", body = [SwordResponse]),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(material_id))]
pub async fn list_swords_by_material(
    State(state): State<AppState>,
    AppPath(material_id): AppPath<i32>,
) -> Result<Json<Vec<SwordResponse>>, AppError> {
    let swords = SwordRepository::new(&state.db)
        .find_by_material(material_id)
        .await?;
    Ok(Json(to_responses(swords)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Swords",
    operation_id = "createSword",
    summary = "Create a sword",
    description = "Creates a sword and its material associations in one transaction. Any failure, such as an unknown material id, leaves no rows behind.",
    request_body = CreateSwordRequest,
    responses(
        (status = 201, description = "Sword created", body = SwordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Store failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_sword(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSwordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = NewSword::try_from(payload)?;
    let model = SwordRepository::new(&state.db).create(new).await?;

    Ok((StatusCode::CREATED, Json(SwordResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Swords",
    operation_id = "updateSword",
    summary = "Update a sword",
    description = "Writes only the provided fields. `material_ids` replaces the material set when present and `[]` clears it. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Sword ID")),
    request_body = UpdateSwordRequest,
    responses(
        (status = 200, description = "Sword updated", body = SwordResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Sword not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_sword(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateSwordRequest>,
) -> Result<Json<SwordResponse>, AppError> {
    let password = payload.admin_password.clone();
    let patch = SwordPatch::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = SwordRepository::new(&state.db).update(id, patch).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Swords",
    operation_id = "deleteSword",
    summary = "Delete a sword",
    description = "Deletes the sword and its material associations. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Sword ID")),
    request_body = AdminCredentials,
    responses(
        (status = 200, description = "Sword deleted", body = MessageResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Sword not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, credentials), fields(id))]
pub async fn delete_sword(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AdminBody(credentials): AdminBody,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state.db, credentials.admin_password.as_deref()).await?;

    SwordRepository::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::deleted("Sword")))
}
