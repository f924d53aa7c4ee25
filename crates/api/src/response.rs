//! Shared response envelope types for API handlers.
//!
//! Every response carries `{ "status", "message" }` and, on success,
//! optionally `{ "data": ... }`. Failures are rendered by
//! [`AppError`](crate::error::AppError) using the same `status` vocabulary.

use axum::http::StatusCode;
use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";
/// Client error (4xx).
pub const STATUS_FAIL: &str = "fail";
/// Server error (5xx).
pub const STATUS_ERROR: &str = "error";

/// Map an HTTP status to the envelope `status` string.
pub fn envelope_status(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        STATUS_ERROR
    } else if status.is_client_error() {
        STATUS_FAIL
    } else {
        STATUS_SUCCESS
    }
}

/// Standard `{ "status", "message", "data"? }` success envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::success("Products fetched", products)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope without a `data` field.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS,
            message: message.into(),
            data: None,
        }
    }
}
