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
use crate::models::category::*;
use crate::models::shared::{AdminCredentials, MessageResponse};
use crate::repository::{CatalogError, CategoryRepository};
use crate::repository::category::CategoryInput;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Categories",
    operation_id = "listCategories",
    summary = "List categories",
    description = "Returns every category ordered by name.",
    responses(
        (status = 200, description = "List of categories", body = [CategoryResponse]),
    ),
)]
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = CategoryRepository::new(&state.db).list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Categories",
    operation_id = "getCategory",
    summary = "Get a category by ID",
    description = "Returns the category with `swordCount`, the number of swords filed under it.",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryDetailResponse),
        (status = 400, description = "Invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CategoryDetailResponse>, AppError> {
    let repo = CategoryRepository::new(&state.db);
    let category = repo
        .find_by_id(id)
        .await?
        .ok_or(CatalogError::NotFound("Category"))?;
    let sword_count = repo.count_swords(id).await?;

    Ok(Json(CategoryDetailResponse {
        category: category.into(),
        sword_count,
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Categories",
    operation_id = "createCategory",
    summary = "Create a category",
    description = "Requires `adminPassword`.",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = payload.admin_password.clone();
    let input = CategoryInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = CategoryRepository::new(&state.db).create(input).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Categories",
    operation_id = "updateCategory",
    summary = "Replace a category",
    description = "Overwrites name and description. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    let password = payload.admin_password.clone();
    let input = CategoryInput::try_from(payload)?;
    require_admin(&state.db, password.as_deref()).await?;

    let model = CategoryRepository::new(&state.db).update(id, input).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Categories",
    operation_id = "deleteCategory",
    summary = "Delete a category",
    description = "Refused with CONFLICT while any sword is filed under the category. Requires `adminPassword`.",
    params(("id" = i32, Path, description = "Category ID")),
    request_body = AdminCredentials,
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 400, description = "Invalid id or category still has swords (VALIDATION_ERROR, CONFLICT)", body = ErrorBody),
        (status = 403, description = "Admin password missing or wrong (ADMIN_PASSWORD_REQUIRED, INVALID_ADMIN_PASSWORD)", body = ErrorBody),
        (status = 404, description = "Category not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, credentials), fields(id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AdminBody(credentials): AdminBody,
) -> Result<Json<MessageResponse>, AppError> {
    require_admin(&state.db, credentials.admin_password.as_deref()).await?;

    CategoryRepository::new(&state.db).delete(id).await?;
    Ok(Json(MessageResponse::deleted("Category")))
}
