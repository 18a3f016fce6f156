use crate::domain::model::CategoryInput;
use crate::transport::http::types::{ApiResult, AppState, CategoryResponse, WebResponse};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories", body = [CategoryResponse])
    )
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> ApiResult<Vec<CategoryResponse>> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(WebResponse::success(
        categories.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    request: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<CategoryResponse> {
    let Json(input) = request?;
    let category = state.catalog.create_category(input).await?;
    Ok(Json(WebResponse::success(category.into())))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn find_category_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<CategoryResponse> {
    let Path(id) = id?;
    let category = state.catalog.find_category(id).await?;
    Ok(Json(WebResponse::success(category.into())))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    request: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<CategoryResponse> {
    let Path(id) = id?;
    let Json(input) = request?;
    let category = state.catalog.update_category(id, input).await?;
    Ok(Json(WebResponse::success(category.into())))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted; referencing products lose their category"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.catalog.delete_category(id).await?;
    Ok(Json(WebResponse::ok()))
}
