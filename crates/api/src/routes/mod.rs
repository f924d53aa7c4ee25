pub mod auth;
pub mod health;
pub mod product;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                         POST   register
/// /auth/login                            POST   login
/// /auth/refresh-token                    POST   rotate token pair
/// /auth/me                               GET    current user (bearer)
///
/// /admin/product/addProduct              POST   create (admin)
/// /admin/product/products                GET    list newest first (admin)
/// /admin/product/updateProduct/{id}      PUT    partial update (admin)
/// /admin/product/deleteProduct/{id}      DELETE delete (admin)
///
/// /upload/single                         POST   one file (bearer)
/// /upload/multiple                       POST   up to ten files (bearer)
/// /upload/{folderName}                   GET    list folder (bearer)
/// /upload/{folderName}/{filename}        DELETE delete file (bearer)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin/product", product::router())
        .nest("/upload", upload::router())
}
