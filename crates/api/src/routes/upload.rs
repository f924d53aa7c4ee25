//! Route definitions for the `/upload` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use shopgate_core::uploads::{MAX_FILES_PER_REQUEST, MAX_FILE_SIZE};

use crate::handlers::upload;
use crate::state::AppState;

/// Multipart framing allowance on top of the file payloads.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Routes mounted at `/upload`.
///
/// The body limit here replaces the JSON-sized default so a full
/// multi-file request fits; per-file size is enforced by the handlers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/single", post(upload::upload_single))
        .route("/multiple", post(upload::upload_multiple))
        .route("/{folder_name}", get(upload::list_files))
        .route("/{folder_name}/{filename}", delete(upload::delete_file))
        .layer(DefaultBodyLimit::max(
            MAX_FILE_SIZE * MAX_FILES_PER_REQUEST + MULTIPART_OVERHEAD,
        ))
}
