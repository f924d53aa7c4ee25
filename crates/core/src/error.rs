use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The presented access token was well-formed but past its expiry.
    ///
    /// Kept apart from [`CoreError::Unauthorized`] so clients can tell
    /// "refresh and retry" from "log in again".
    #[error("Unauthorized: token_expired")]
    TokenExpired,

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
