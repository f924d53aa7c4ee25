//! Request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod product;
pub mod upload;

use axum::http::Uri;

use crate::error::AppError;

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
