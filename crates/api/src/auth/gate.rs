//! Bearer-token authorization.
//!
//! The gate verifies the access token and then re-reads the subject from
//! the user store on every request, so deactivation and role changes apply
//! immediately instead of at token expiry.

use std::sync::Arc;

use shopgate_core::error::CoreError;
use shopgate_db::models::user::User;
use shopgate_db::store::UserStore;

use crate::auth::jwt::{TokenError, TokenSigners};
use crate::error::{AppError, AppResult};

const MISSING_TOKEN: &str = "Missing token";
const INVALID_TOKEN: &str = "Unauthorized";
const INVALID_USER: &str = "Invalid user";
const ADMINS_ONLY: &str = "Admins only";

#[derive(Clone)]
pub struct AuthGate {
    users: Arc<dyn UserStore>,
    signers: Arc<TokenSigners>,
}

impl AuthGate {
    pub fn new(users: Arc<dyn UserStore>, signers: Arc<TokenSigners>) -> Self {
        Self { users, signers }
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value.
    ///
    /// Returns `None` for any other scheme or an empty token.
    pub fn bearer_token(header: Option<&str>) -> Option<&str> {
        header?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Resolve the raw `Authorization` header to a live, active user.
    pub async fn authenticate(&self, authorization: Option<&str>) -> AppResult<User> {
        let token = Self::bearer_token(authorization).ok_or_else(|| unauthorized(MISSING_TOKEN))?;

        let claims = self.signers.access.verify(token).map_err(|e| match e {
            TokenError::Expired => AppError::Core(CoreError::TokenExpired),
            other => {
                tracing::debug!(error = %other, "Access token rejected");
                unauthorized(INVALID_TOKEN)
            }
        })?;

        match self.users.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                tracing::debug!(user_id = claims.sub, "Token subject missing or inactive");
                Err(unauthorized(INVALID_USER))
            }
        }
    }

    /// As [`authenticate`](Self::authenticate), additionally requiring the admin role.
    pub async fn authenticate_admin(&self, authorization: Option<&str>) -> AppResult<User> {
        let user = self.authenticate(authorization).await?;
        if !user.role.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(ADMINS_ONLY.into())));
        }
        Ok(user)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use shopgate_core::roles::Role;
    use shopgate_db::models::user::CreateUser;
    use shopgate_db::store::MemoryUserStore;

    use super::*;
    use crate::auth::jwt::{AuthConfig, TokenSettings};

    struct Fixture {
        gate: AuthGate,
        store: Arc<MemoryUserStore>,
        signers: Arc<TokenSigners>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryUserStore::new());
        let signers = Arc::new(TokenSigners::new(&AuthConfig {
            access: TokenSettings {
                secret: "gate-access".into(),
                lifetime: Duration::minutes(15),
            },
            refresh: TokenSettings {
                secret: "gate-refresh".into(),
                lifetime: Duration::days(7),
            },
        }));
        let user = store
            .create(&CreateUser {
                full_name: "Dana".into(),
                username: "dana".into(),
                email: "dana@x.com".into(),
                password_hash: "$argon2id$unused".into(),
                role: Role::User,
            })
            .await
            .unwrap();
        Fixture {
            gate: AuthGate::new(store.clone(), signers.clone()),
            store,
            signers,
            user,
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(AuthGate::bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(AuthGate::bearer_token(Some("Basic abc")), None);
        assert_eq!(AuthGate::bearer_token(Some("Bearer ")), None);
        assert_eq!(AuthGate::bearer_token(Some("abc")), None);
        assert_eq!(AuthGate::bearer_token(None), None);
    }

    #[tokio::test]
    async fn valid_access_token_resolves_user() {
        let f = fixture().await;
        let token = f.signers.access.issue(f.user.id, &f.user.email).unwrap();

        let user = f.gate.authenticate(Some(&bearer(&token))).await.unwrap();
        assert_eq!(user.id, f.user.id);
    }

    #[tokio::test]
    async fn missing_header_is_reported() {
        let f = fixture().await;

        assert_matches!(
            f.gate.authenticate(None).await,
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == MISSING_TOKEN
        );
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted() {
        let f = fixture().await;
        let token = f.signers.refresh.issue(f.user.id, &f.user.email).unwrap();

        assert_matches!(
            f.gate.authenticate(Some(&bearer(&token))).await,
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == INVALID_TOKEN
        );
    }

    #[tokio::test]
    async fn expired_token_is_distinguished() {
        let f = fixture().await;
        let long_ago = Utc::now().timestamp() - 3600;
        let token = f
            .signers
            .access
            .issue_at(f.user.id, &f.user.email, long_ago)
            .unwrap();

        assert_matches!(
            f.gate.authenticate(Some(&bearer(&token))).await,
            Err(AppError::Core(CoreError::TokenExpired))
        );
    }

    #[tokio::test]
    async fn deactivated_user_is_rejected_immediately() {
        let f = fixture().await;
        let token = f.signers.access.issue(f.user.id, &f.user.email).unwrap();
        f.store.set_active(f.user.id, false).await.unwrap();

        assert_matches!(
            f.gate.authenticate(Some(&bearer(&token))).await,
            Err(AppError::Core(CoreError::Unauthorized(msg))) if msg == INVALID_USER
        );
    }

    #[tokio::test]
    async fn admin_gate_follows_current_role() {
        let f = fixture().await;
        let token = f.signers.access.issue(f.user.id, &f.user.email).unwrap();
        let header = bearer(&token);

        assert_matches!(
            f.gate.authenticate_admin(Some(&header)).await,
            Err(AppError::Core(CoreError::Forbidden(msg))) if msg == ADMINS_ONLY
        );

        f.store.set_role(f.user.id, Role::Admin).await.unwrap();
        let admin = f.gate.authenticate_admin(Some(&header)).await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
