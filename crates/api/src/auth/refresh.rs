//! Refresh-token exchange.
//!
//! Every successful refresh mints a brand-new access AND refresh token.
//! The presented refresh token is not revoked: there is no server-side
//! registry, so it stays cryptographically valid until its own expiry.

use std::sync::Arc;

use shopgate_core::error::CoreError;
use shopgate_db::store::UserStore;

use crate::auth::jwt::{TokenPair, TokenSigner, TokenSigners};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct TokenRefresher {
    users: Arc<dyn UserStore>,
    signers: Arc<TokenSigners>,
}

impl TokenRefresher {
    pub fn new(users: Arc<dyn UserStore>, signers: Arc<TokenSigners>) -> Self {
        Self { users, signers }
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// The subject's active flag is re-read here, so a deactivation takes
    /// effect at the next refresh rather than at refresh-token expiry.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> AppResult<TokenPair> {
        let token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Refresh token required"))?;

        let claims = self.signers.refresh.verify(token).map_err(|e| {
            let claimed_sub = TokenSigner::decode_unverified(token).map(|c| c.sub);
            tracing::debug!(error = %e, ?claimed_sub, "Refresh token rejected");
            unauthorized("Invalid refresh token")
        })?;

        let user = match self.users.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => user,
            _ => {
                tracing::warn!(user_id = claims.sub, "Refresh for missing or inactive user");
                return Err(unauthorized("User not found or inactive"));
            }
        };

        let tokens = self
            .signers
            .issue_pair(&user)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        tracing::debug!(user_id = user.id, "Token pair rotated");

        Ok(tokens)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}
