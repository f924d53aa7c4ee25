//! Registration and login.
//!
//! Both paths end in a freshly minted [`TokenPair`]. Transport (cookies,
//! response body) is left to the HTTP handlers.

use std::sync::Arc;

use shopgate_core::error::CoreError;
use shopgate_core::roles::Role;
use shopgate_core::sanitize::clean_text;
use shopgate_core::validation::{require_non_empty, validate_email, validate_password};
use shopgate_db::models::user::{CreateUser, User};
use shopgate_db::store::{StoreError, UserStore};

use crate::auth::jwt::{TokenPair, TokenSigners};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};

/// The single message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub const DUPLICATE_IDENTITY: &str = "User already exists with this email or username";

/// Registration fields as received from the client.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A successfully authenticated user and their new tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct SessionIssuer {
    users: Arc<dyn UserStore>,
    signers: Arc<TokenSigners>,
}

impl SessionIssuer {
    pub fn new(users: Arc<dyn UserStore>, signers: Arc<TokenSigners>) -> Self {
        Self { users, signers }
    }

    /// Create an account and sign the new user in.
    ///
    /// Identity fields are stripped of markup before validation. The
    /// password is hashed as received.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        let full_name = clean_text(&input.full_name);
        let username = clean_text(&input.username);
        let email = clean_text(&input.email);

        require_non_empty("fullName", &full_name)?;
        require_non_empty("userName", &username)?;
        require_non_empty("email", &email)?;
        validate_email(&email)?;
        validate_password(&input.password)?;

        if self.users.exists(&email, &username).await? {
            return Err(CoreError::Conflict(DUPLICATE_IDENTITY.into()).into());
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let create = CreateUser {
            full_name,
            username,
            email,
            password_hash,
            role: Role::User,
        };

        // A concurrent registration can slip past `exists`; the unique index catches it.
        let user = self.users.create(&create).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => {
                AppError::Core(CoreError::Conflict(DUPLICATE_IDENTITY.into()))
            }
            other => AppError::Store(other),
        })?;

        let tokens = self.mint(&user)?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(AuthSession { user, tokens })
    }

    /// Authenticate by email or username.
    ///
    /// Unknown identity, deactivated account and wrong password are
    /// indistinguishable to the caller; the reason is only logged.
    pub async fn login(&self, identity: &str, password: &str) -> AppResult<AuthSession> {
        let identity = clean_text(identity);
        if identity.is_empty() || password.is_empty() {
            return Err(invalid_credentials());
        }

        let Some(user) = self.users.find_by_identity(&identity).await? else {
            tracing::warn!(reason = "unknown_identity", "Login rejected");
            return Err(invalid_credentials());
        };

        if !user.is_active {
            tracing::warn!(user_id = user.id, reason = "inactive", "Login rejected");
            return Err(invalid_credentials());
        }

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !password_valid {
            tracing::warn!(user_id = user.id, reason = "bad_password", "Login rejected");
            return Err(invalid_credentials());
        }

        let tokens = self.mint(&user)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthSession { user, tokens })
    }

    fn mint(&self, user: &User) -> AppResult<TokenPair> {
        self.signers
            .issue_pair(user)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}
