use crate::domain::model::ProductInput;
use crate::transport::http::types::{ApiResult, AppState, ProductResponse, WebResponse};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products, in the `data` field of the envelope", body = [ProductResponse]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_products_handler(State(state): State<AppState>) -> ApiResult<Vec<ProductResponse>> {
    let products = state.catalog.list_products().await?;
    Ok(Json(WebResponse::success(
        products.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation failed, malformed or duplicate code"),
        (status = 404, description = "Referenced category not found"),
        (status = 500, description = "Code generation or storage failure")
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<ProductResponse> {
    let Json(input) = request?;
    let product = state.catalog.create_product(input).await?;
    Ok(Json(WebResponse::success(product.into())))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn find_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<ProductResponse> {
    let Path(id) = id?;
    let product = state.catalog.find_product(id).await?;
    Ok(Json(WebResponse::success(product.into())))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product replaced", body = ProductResponse),
        (status = 400, description = "Validation failed, malformed or duplicate code"),
        (status = 404, description = "Product or referenced category not found")
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    request: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<ProductResponse> {
    let Path(id) = id?;
    let Json(input) = request?;
    let product = state.catalog.update_product(id, input).await?;
    Ok(Json(WebResponse::success(product.into())))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    state.catalog.delete_product(id).await?;
    Ok(Json(WebResponse::ok()))
}
