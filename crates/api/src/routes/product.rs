//! Route definitions for the admin `/product` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/admin/product`. Every route requires an admin.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addProduct", post(product::create_product))
        .route("/products", get(product::list_products))
        .route("/updateProduct/{id}", put(product::update_product))
        .route("/deleteProduct/{id}", delete(product::delete_product))
}
