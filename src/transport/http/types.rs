use crate::app::CatalogService;
use crate::domain::model::{Category, Product};
use crate::domain::CatalogError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

/// Envelope wrapped around every response body.
#[derive(Serialize, Debug)]
pub struct WebResponse<T> {
    /// `success` or `failed`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: None,
            data: Some(data),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl WebResponse<()> {
    /// Success without a payload (deletes).
    pub fn ok() -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: None,
            data: None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub price: f64,
    /// `null` when the product has no category.
    pub category: Option<CategoryResponse>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            code: product.code,
            name: product.name,
            price: product.price,
            category: product.category.map(Into::into),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::Validation(_)
            | CatalogError::InvalidFormat
            | CatalogError::DuplicateCode
            | CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Internal(_) | CatalogError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            CatalogError::Storage(e) => {
                error!(error = %e, "storage failure");
                "Internal server error.".to_string()
            }
            CatalogError::Internal(msg) => {
                error!(error = %msg, "internal failure");
                msg.clone()
            }
            other => other.to_string(),
        };

        (status, Json(WebResponse::<()>::failed(message))).into_response()
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(err: JsonRejection) -> Self {
        CatalogError::BadRequest(format!("Invalid JSON body: {}", err.body_text()))
    }
}

impl From<PathRejection> for CatalogError {
    fn from(err: PathRejection) -> Self {
        CatalogError::BadRequest(format!("Invalid path parameter: {}", err.body_text()))
    }
}

pub type ApiResult<T> = Result<Json<WebResponse<T>>, CatalogError>;
