//! Handlers for the admin `/product` resource.
//!
//! Request bodies are scrubbed with [`clean_json`] before they are
//! deserialized, then checked with `validator`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shopgate_core::error::CoreError;
use shopgate_core::sanitize::clean_json;
use shopgate_core::types::DbId;
use shopgate_core::validation::from_validation_errors;
use shopgate_db::models::product::{CreateProduct, Product, ProductStatus, UpdateProduct};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /addProduct`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[serde(rename = "desc", default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(length(min = 1, message = "Main image is required"))]
    pub main_image: String,
    #[serde(default)]
    pub secondary_images: Vec<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Request body for `PUT /updateProduct/{id}`. Absent fields are left as-is.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[serde(rename = "desc")]
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,
    #[validate(length(min = 1, message = "Main image must not be empty"))]
    pub main_image: Option<String>,
    pub secondary_images: Option<Vec<String>>,
    pub link: Option<String>,
    pub status: Option<ProductStatus>,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price: req.price,
            main_image: req.main_image,
            secondary_images: req.secondary_images,
            link: req.link.filter(|l| !l.is_empty()),
            status: req.status,
        }
    }
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price: req.price,
            main_image: req.main_image,
            secondary_images: req.secondary_images,
            link: req.link,
            status: req.status,
        }
    }
}

/// Sanitize, deserialize and validate a raw JSON body.
fn parse_clean<T: DeserializeOwned + Validate>(raw: Value) -> AppResult<T> {
    let parsed: T = serde_json::from_value(clean_json(raw))
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
    parsed
        .validate()
        .map_err(|e| AppError::Core(from_validation_errors(&e)))?;
    Ok(parsed)
}

/// POST /api/admin/product/addProduct
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(raw): AppJson<Value>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let input: CreateProductRequest = parse_clean(raw)?;
    let product = state.products.create(&input.into()).await?;

    tracing::info!(product_id = product.id, admin_id = admin.id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Product created", product)),
    ))
}

/// GET /api/admin/product/products -- newest first.
pub async fn list_products(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = state.products.list().await?;
    Ok(Json(ApiResponse::success("Products fetched", products)))
}

/// PUT /api/admin/product/updateProduct/{id}
pub async fn update_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(raw): AppJson<Value>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let input: UpdateProductRequest = parse_clean(raw)?;
    let product = state
        .products
        .update(id, &input.into())
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

    tracing::info!(product_id = id, admin_id = admin.id, "Product updated");
    Ok(Json(ApiResponse::success("Product updated", product)))
}

/// DELETE /api/admin/product/deleteProduct/{id}
pub async fn delete_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.products.delete(id).await? {
        return Err(CoreError::NotFound {
            entity: "Product",
            id,
        }
        .into());
    }

    tracing::info!(product_id = id, admin_id = admin.id, "Product deleted");
    Ok(Json(ApiResponse::message("Product deleted")))
}
